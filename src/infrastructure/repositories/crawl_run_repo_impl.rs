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

use crate::domain::models::crawl_run::{CrawlRun, CrawlRunStatus};
use crate::domain::repositories::crawl_run_repository::CrawlRunRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::crawl_run as run_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 抓取运行仓库实现
#[derive(Clone)]
pub struct CrawlRunRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl CrawlRunRepositoryImpl {
    /// 创建新的抓取运行仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<run_entity::Model> for CrawlRun {
    fn from(model: run_entity::Model) -> Self {
        Self {
            id: model.id,
            crawler_id: model.crawler_id,
            status: model.status.parse().unwrap_or_default(),
            started_at: model.started_at,
            completed_at: model.completed_at,
            items_found: model.items_found,
            items_processed: model.items_processed,
            error: model.error,
        }
    }
}

#[async_trait]
impl CrawlRunRepository for CrawlRunRepositoryImpl {
    async fn insert(&self, run: &CrawlRun) -> Result<(), RepositoryError> {
        let model = run_entity::ActiveModel {
            id: Set(run.id),
            crawler_id: Set(run.crawler_id),
            status: Set(run.status.to_string()),
            started_at: Set(run.started_at),
            completed_at: Set(run.completed_at),
            items_found: Set(run.items_found),
            items_processed: Set(run.items_processed),
            error: Set(run.error.clone()),
            created_at: Set(Utc::now().fixed_offset()),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(())
    }

    async fn update(&self, run: &CrawlRun) -> Result<(), RepositoryError> {
        let model = run_entity::ActiveModel {
            id: Set(run.id),
            status: Set(run.status.to_string()),
            started_at: Set(run.started_at),
            completed_at: Set(run.completed_at),
            items_found: Set(run.items_found),
            items_processed: Set(run.items_processed),
            error: Set(run.error.clone()),
            ..Default::default()
        };

        model.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CrawlRun>, RepositoryError> {
        let model = run_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn has_running(&self, crawler_id: Uuid) -> Result<bool, RepositoryError> {
        let count = run_entity::Entity::find()
            .filter(run_entity::Column::CrawlerId.eq(crawler_id))
            .filter(run_entity::Column::Status.eq(CrawlRunStatus::Running.to_string()))
            .count(self.db.as_ref())
            .await?;

        Ok(count > 0)
    }
}
