// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::repositories::lease_repository::LeaseRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::crawler_lease as lease_entity;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 爬虫租约仓库实现
///
/// 通过带TTL的租约行实现集群内同一爬虫的互斥：
/// 先尝试插入，冲突则仅在租约属于自己或已过期时条件更新。
/// 两步都是单语句，无需显式事务
#[derive(Clone)]
pub struct LeaseRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl LeaseRepositoryImpl {
    /// 创建新的租约仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LeaseRepository for LeaseRepositoryImpl {
    async fn acquire(
        &self,
        crawler_id: Uuid,
        holder: Uuid,
        ttl: Duration,
    ) -> Result<bool, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let expires_at = now + ttl;

        let model = lease_entity::ActiveModel {
            crawler_id: Set(crawler_id),
            holder: Set(holder),
            expires_at: Set(expires_at),
        };

        let inserted = lease_entity::Entity::insert(model)
            .on_conflict(
                OnConflict::column(lease_entity::Column::CrawlerId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(self.db.as_ref())
            .await;

        match inserted {
            Ok(_) => return Ok(true),
            Err(DbErr::RecordNotInserted) => {}
            Err(err) => return Err(err.into()),
        }

        // 租约行已存在：仅当属于自己或已过期时接管
        let result = lease_entity::Entity::update_many()
            .col_expr(lease_entity::Column::Holder, Expr::value(holder))
            .col_expr(lease_entity::Column::ExpiresAt, Expr::value(expires_at))
            .filter(lease_entity::Column::CrawlerId.eq(crawler_id))
            .filter(
                Condition::any()
                    .add(lease_entity::Column::Holder.eq(holder))
                    .add(lease_entity::Column::ExpiresAt.lt(now)),
            )
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn release(&self, crawler_id: Uuid, holder: Uuid) -> Result<(), RepositoryError> {
        lease_entity::Entity::delete_many()
            .filter(lease_entity::Column::CrawlerId.eq(crawler_id))
            .filter(lease_entity::Column::Holder.eq(holder))
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }
}
