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

use crate::domain::models::moderation_item::{ModerationItem, ModerationStatus};
use crate::domain::repositories::moderation_repository::ModerationRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::moderation_item as item_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 审核队列仓库实现
///
/// 入队依赖 `(crawler_id, url_hash)` 唯一索引做幂等，
/// 冲突时不写入也不报错
#[derive(Clone)]
pub struct ModerationRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ModerationRepositoryImpl {
    /// 创建新的审核队列仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<item_entity::Model> for ModerationItem {
    fn from(model: item_entity::Model) -> Self {
        Self {
            id: model.id,
            crawler_id: model.crawler_id,
            url: model.url,
            url_hash: model.url_hash,
            title: model.title,
            summary: model.summary,
            content: model.content,
            image_url: model.image_url,
            author: model.author,
            source_name: model.source_name,
            language: model.language,
            score: model.score,
            status: model.status.parse().unwrap_or_default(),
            discovered_at: model.discovered_at,
            decided_at: model.decided_at,
            decided_by: model.decided_by,
        }
    }
}

impl From<&ModerationItem> for item_entity::ActiveModel {
    fn from(item: &ModerationItem) -> Self {
        Self {
            id: Set(item.id),
            crawler_id: Set(item.crawler_id),
            url: Set(item.url.clone()),
            url_hash: Set(item.url_hash.clone()),
            title: Set(item.title.clone()),
            summary: Set(item.summary.clone()),
            content: Set(item.content.clone()),
            image_url: Set(item.image_url.clone()),
            author: Set(item.author.clone()),
            source_name: Set(item.source_name.clone()),
            language: Set(item.language.clone()),
            score: Set(item.score),
            status: Set(item.status.to_string()),
            discovered_at: Set(item.discovered_at),
            decided_at: Set(item.decided_at),
            decided_by: Set(item.decided_by.clone()),
        }
    }
}

#[async_trait]
impl ModerationRepository for ModerationRepositoryImpl {
    async fn exists(&self, crawler_id: Uuid, url_hash: &str) -> Result<bool, RepositoryError> {
        let count = item_entity::Entity::find()
            .filter(item_entity::Column::CrawlerId.eq(crawler_id))
            .filter(item_entity::Column::UrlHash.eq(url_hash))
            .count(self.db.as_ref())
            .await?;

        Ok(count > 0)
    }

    async fn insert_pending(&self, item: &ModerationItem) -> Result<bool, RepositoryError> {
        let model: item_entity::ActiveModel = item.into();

        let result = item_entity::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    item_entity::Column::CrawlerId,
                    item_entity::Column::UrlHash,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(self.db.as_ref())
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_ids(
        &self,
        crawler_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<ModerationItem>, RepositoryError> {
        let models = item_entity::Entity::find()
            .filter(item_entity::Column::CrawlerId.eq(crawler_id))
            .filter(item_entity::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ModerationItem>, RepositoryError> {
        let model = item_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ModerationStatus,
        decided_by: &str,
        decided_at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError> {
        item_entity::Entity::update_many()
            .col_expr(item_entity::Column::Status, Expr::value(status.to_string()))
            .col_expr(
                item_entity::Column::DecidedBy,
                Expr::value(decided_by.to_owned()),
            )
            .col_expr(item_entity::Column::DecidedAt, Expr::value(decided_at))
            .filter(item_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn list_by_status(
        &self,
        crawler_id: Uuid,
        status: ModerationStatus,
        limit: u64,
    ) -> Result<Vec<ModerationItem>, RepositoryError> {
        let models = item_entity::Entity::find()
            .filter(item_entity::Column::CrawlerId.eq(crawler_id))
            .filter(item_entity::Column::Status.eq(status.to_string()))
            .order_by_desc(item_entity::Column::DiscoveredAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
