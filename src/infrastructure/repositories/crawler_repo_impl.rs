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

use crate::domain::models::crawler::{Crawler, Keyword, Source};
use crate::domain::repositories::crawler_repository::CrawlerRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::{
    crawler as crawler_entity, keyword as keyword_entity, source as source_entity,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 爬虫仓库实现
///
/// 基于SeaORM实现的爬虫数据访问层，负责爬虫及其
/// 关键词、信息源的组装
#[derive(Clone)]
pub struct CrawlerRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl CrawlerRepositoryImpl {
    /// 创建新的爬虫仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 从实体模型组装领域爬虫
    fn assemble(
        model: crawler_entity::Model,
        keywords: Vec<keyword_entity::Model>,
        sources: Vec<source_entity::Model>,
    ) -> Crawler {
        Crawler {
            id: model.id,
            name: model.name,
            is_active: model.is_active,
            min_match_score: model.min_match_score,
            last_run_at: model.last_run_at,
            keywords: keywords.into_iter().map(Into::into).collect(),
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    /// 加载爬虫的关键词与信息源，按创建顺序
    async fn load_children(
        &self,
        crawler_id: Uuid,
    ) -> Result<(Vec<keyword_entity::Model>, Vec<source_entity::Model>), RepositoryError> {
        let keywords = keyword_entity::Entity::find()
            .filter(keyword_entity::Column::CrawlerId.eq(crawler_id))
            .order_by_asc(keyword_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        let sources = source_entity::Entity::find()
            .filter(source_entity::Column::CrawlerId.eq(crawler_id))
            .order_by_asc(source_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok((keywords, sources))
    }
}

impl From<keyword_entity::Model> for Keyword {
    fn from(model: keyword_entity::Model) -> Self {
        Self {
            id: model.id,
            crawler_id: model.crawler_id,
            term: model.term,
            origin: model.origin.parse().unwrap_or_default(),
        }
    }
}

impl From<source_entity::Model> for Source {
    fn from(model: source_entity::Model) -> Self {
        Self {
            id: model.id,
            crawler_id: model.crawler_id,
            url: model.url,
            source_type: model.source_type.parse().unwrap_or_default(),
            enabled: model.enabled,
            max_pages: model.max_pages,
            max_depth: model.max_depth,
            follow_links: model.follow_links,
            last_status: model.last_status,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl CrawlerRepository for CrawlerRepositoryImpl {
    async fn create(&self, crawler: &Crawler) -> Result<(), RepositoryError> {
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await?;

        let model = crawler_entity::ActiveModel {
            id: Set(crawler.id),
            name: Set(crawler.name.clone()),
            is_active: Set(crawler.is_active),
            min_match_score: Set(crawler.min_match_score),
            last_run_at: Set(crawler.last_run_at),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(&txn).await?;

        for keyword in &crawler.keywords {
            let model = keyword_entity::ActiveModel {
                id: Set(keyword.id),
                crawler_id: Set(crawler.id),
                term: Set(keyword.term.clone()),
                origin: Set(keyword.origin.to_string()),
                created_at: Set(now),
            };
            model.insert(&txn).await?;
        }

        for source in &crawler.sources {
            let model = source_entity::ActiveModel {
                id: Set(source.id),
                crawler_id: Set(crawler.id),
                url: Set(source.url.clone()),
                source_type: Set(source.source_type.to_string()),
                enabled: Set(source.enabled),
                max_pages: Set(source.max_pages),
                max_depth: Set(source.max_depth),
                follow_links: Set(source.follow_links),
                last_status: Set(source.last_status.clone()),
                created_at: Set(source.created_at),
            };
            model.insert(&txn).await?;
        }

        txn.commit().await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Crawler>, RepositoryError> {
        let model = crawler_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        let Some(model) = model else {
            return Ok(None);
        };

        let (keywords, sources) = self.load_children(model.id).await?;
        Ok(Some(Self::assemble(model, keywords, sources)))
    }

    async fn find_due(
        &self,
        now: DateTime<FixedOffset>,
        interval: Duration,
    ) -> Result<Vec<Crawler>, RepositoryError> {
        let cutoff = now - interval;

        let models = crawler_entity::Entity::find()
            .filter(crawler_entity::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(crawler_entity::Column::LastRunAt.is_null())
                    .add(crawler_entity::Column::LastRunAt.lt(cutoff)),
            )
            .order_by_asc(crawler_entity::Column::LastRunAt)
            .all(self.db.as_ref())
            .await?;

        let mut crawlers = Vec::with_capacity(models.len());
        for model in models {
            let (keywords, sources) = self.load_children(model.id).await?;
            crawlers.push(Self::assemble(model, keywords, sources));
        }

        Ok(crawlers)
    }

    async fn touch_last_run(
        &self,
        id: Uuid,
        at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError> {
        crawler_entity::Entity::update_many()
            .col_expr(crawler_entity::Column::LastRunAt, Expr::value(at))
            .col_expr(
                crawler_entity::Column::UpdatedAt,
                Expr::value(Utc::now().fixed_offset()),
            )
            .filter(crawler_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn update_source_status(
        &self,
        source_id: Uuid,
        status: &str,
    ) -> Result<(), RepositoryError> {
        source_entity::Entity::update_many()
            .col_expr(
                source_entity::Column::LastStatus,
                Expr::value(status.to_owned()),
            )
            .filter(source_entity::Column::Id.eq(source_id))
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }
}
