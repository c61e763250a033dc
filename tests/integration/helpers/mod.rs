// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use curatrs::domain::models::crawler::{Crawler, Keyword, KeywordOrigin, Source, SourceType};
use curatrs::domain::models::moderation_item::{ModerationItem, ModerationStatus};
use curatrs::domain::repositories::crawler_repository::CrawlerRepository;
use curatrs::infrastructure::repositories::crawler_repo_impl::CrawlerRepositoryImpl;
use curatrs::utils::url_norm;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use uuid::Uuid;

/// 创建迁移完成的内存SQLite数据库
///
/// 内存库绑定单个连接，连接池必须限制为1
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("Failed to connect to in-memory sqlite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    Arc::new(db)
}

/// 构造测试爬虫，关键词来源均为manual
pub fn build_crawler(min_match_score: f64, terms: &[&str]) -> Crawler {
    let id = Uuid::new_v4();
    let keywords = terms
        .iter()
        .map(|term| Keyword {
            id: Uuid::new_v4(),
            crawler_id: id,
            term: (*term).to_string(),
            origin: KeywordOrigin::Manual,
        })
        .collect();

    Crawler {
        id,
        name: format!("crawler-{}", id),
        is_active: true,
        min_match_score,
        last_run_at: None,
        keywords,
        sources: Vec::new(),
    }
}

/// 持久化一个爬虫行并返回其ID
///
/// moderation_items带爬虫外键，引用前必须先落父行
pub async fn seed_crawler(db: &Arc<DatabaseConnection>) -> Uuid {
    let crawler = build_crawler(0.5, &["rust"]);
    let repo = CrawlerRepositoryImpl::new(db.clone());
    repo.create(&crawler).await.expect("Failed to seed crawler");
    crawler.id
}

/// 构造RSS信息源
pub fn rss_source(crawler_id: Uuid, url: &str) -> Source {
    Source {
        id: Uuid::new_v4(),
        crawler_id,
        url: url.to_string(),
        source_type: SourceType::Rss,
        enabled: true,
        max_pages: 10,
        max_depth: 2,
        follow_links: false,
        last_status: None,
        created_at: Utc::now().fixed_offset(),
    }
}

/// 构造待审条目，url_hash由URL规范化派生
pub fn pending_item(crawler_id: Uuid, url: &str, title: &str) -> ModerationItem {
    ModerationItem {
        id: Uuid::new_v4(),
        crawler_id,
        url: url_norm::normalize(url),
        url_hash: url_norm::url_hash(url),
        title: Some(title.to_string()),
        summary: None,
        content: None,
        image_url: None,
        author: None,
        source_name: None,
        language: None,
        score: 0.8,
        status: ModerationStatus::Pending,
        discovered_at: Utc::now().fixed_offset(),
        decided_at: None,
        decided_by: None,
    }
}
