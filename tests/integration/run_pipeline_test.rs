// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, Utc};
use curatrs::domain::models::crawl_run::CrawlRunStatus;
use curatrs::domain::models::moderation_item::ModerationStatus;
use curatrs::domain::repositories::crawler_repository::CrawlerRepository;
use curatrs::domain::repositories::moderation_repository::ModerationRepository;
use curatrs::domain::services::moderation_service::ModerationService;
use curatrs::domain::services::scoring_service::{KeywordScorer, Scorer};
use curatrs::engine::run_engine::RunEngine;
use curatrs::fetchers::router::FetcherRouter;
use curatrs::fetchers::rss_fetcher::RssFetcher;
use curatrs::fetchers::traits::SourceFetcher;
use curatrs::fetchers::web_fetcher::WebFetcher;
use curatrs::infrastructure::repositories::crawl_run_repo_impl::CrawlRunRepositoryImpl;
use curatrs::infrastructure::repositories::crawler_repo_impl::CrawlerRepositoryImpl;
use curatrs::infrastructure::repositories::moderation_repo_impl::ModerationRepositoryImpl;
use curatrs::infrastructure::repositories::post_repo_impl::PostRepositoryImpl;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::{build_crawler, rss_source, setup_db};

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Tech Digest</title>
    <language>en</language>
    <item>
      <title>Rust async programming guide</title>
      <link>https://blog.example.com/rust-async</link>
      <description>Deep dive into async Rust.</description>
    </item>
    <item>
      <title>Weekend cooking recipes</title>
      <link>https://blog.example.com/recipes</link>
      <description>Nothing technical here.</description>
    </item>
    <item>
      <title>Rust async programming guide (shared link)</title>
      <link>https://blog.example.com/rust-async?utm_source=newsletter</link>
      <description>Deep dive into async Rust.</description>
    </item>
  </channel>
</rss>"#;

struct Pipeline {
    crawlers: Arc<CrawlerRepositoryImpl>,
    moderation: Arc<ModerationRepositoryImpl>,
    engine: RunEngine<
        CrawlerRepositoryImpl,
        CrawlRunRepositoryImpl,
        ModerationRepositoryImpl,
        PostRepositoryImpl,
    >,
}

fn build_pipeline(db: Arc<DatabaseConnection>, max_items_per_run: usize) -> Pipeline {
    let crawlers = Arc::new(CrawlerRepositoryImpl::new(db.clone()));
    let runs = Arc::new(CrawlRunRepositoryImpl::new(db.clone()));
    let moderation = Arc::new(ModerationRepositoryImpl::new(db.clone()));
    let posts = Arc::new(PostRepositoryImpl::new(db));

    let client = reqwest::Client::new();
    let rss: Arc<dyn SourceFetcher> = Arc::new(RssFetcher::new(client.clone()));
    let web: Arc<dyn SourceFetcher> = Arc::new(WebFetcher::new(client, 2));
    let fetchers = Arc::new(FetcherRouter::new(rss, web));
    let scorer: Arc<dyn Scorer> = Arc::new(KeywordScorer::new());

    let service = Arc::new(ModerationService::new(moderation.clone(), posts));
    let engine = RunEngine::new(crawlers.clone(), runs, service, fetchers, scorer, max_items_per_run);

    Pipeline {
        crawlers,
        moderation,
        engine,
    }
}

#[tokio::test]
async fn run_fetches_scores_dedupes_and_queues() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FEED, "application/rss+xml"))
        .mount(&server)
        .await;

    let db = setup_db().await;
    let pipeline = build_pipeline(db, 100);

    let mut crawler = build_crawler(0.3, &["rust"]);
    crawler
        .sources
        .push(rss_source(crawler.id, &format!("{}/feed.xml", server.uri())));
    pipeline.crawlers.create(&crawler).await.unwrap();

    let ctx = pipeline.engine.create_run(crawler.id).await.unwrap();
    let run = pipeline.engine.execute(ctx).await;

    // 三条抓到：一条入队，一条低于阈值丢弃，一条是跟踪参数变体去重
    assert_eq!(run.status, CrawlRunStatus::Completed);
    assert_eq!(run.items_found, 3);
    assert_eq!(run.items_processed, 1);
    assert!(run.completed_at.is_some());

    let pending = pipeline
        .moderation
        .list_by_status(crawler.id, ModerationStatus::Pending, 10)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].url, "https://blog.example.com/rust-async");
    assert!(pending[0].score >= 0.3);
    assert_eq!(pending[0].source_name.as_deref(), Some("Tech Digest"));

    // 信息源诊断信息已回写
    let stored = pipeline
        .crawlers
        .find_by_id(crawler.id)
        .await
        .unwrap()
        .unwrap();
    let status = stored.sources[0].last_status.as_deref().unwrap();
    assert!(status.starts_with("ok: 3 items"), "got {status}");
}

#[tokio::test]
async fn second_run_skips_already_seen_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FEED, "application/rss+xml"))
        .mount(&server)
        .await;

    let db = setup_db().await;
    let pipeline = build_pipeline(db, 100);

    let mut crawler = build_crawler(0.3, &["rust"]);
    crawler
        .sources
        .push(rss_source(crawler.id, &format!("{}/feed.xml", server.uri())));
    pipeline.crawlers.create(&crawler).await.unwrap();

    let ctx = pipeline.engine.create_run(crawler.id).await.unwrap();
    let first = pipeline.engine.execute(ctx).await;
    assert_eq!(first.items_processed, 1);

    let ctx = pipeline.engine.create_run(crawler.id).await.unwrap();
    let second = pipeline.engine.execute(ctx).await;

    // 去重跨运行生效：条目仍被抓到但没有新的入队
    assert_eq!(second.status, CrawlRunStatus::Completed);
    assert_eq!(second.items_found, 3);
    assert_eq!(second.items_processed, 0);

    let pending = pipeline
        .moderation
        .list_by_status(crawler.id, ModerationStatus::Pending, 10)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn failing_source_does_not_abort_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FEED, "application/rss+xml"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let db = setup_db().await;
    let pipeline = build_pipeline(db, 100);

    let mut crawler = build_crawler(0.3, &["rust"]);
    let mut broken = rss_source(crawler.id, &format!("{}/broken.xml", server.uri()));
    broken.created_at = Utc::now().fixed_offset() - Duration::minutes(5);
    let healthy = rss_source(crawler.id, &format!("{}/feed.xml", server.uri()));
    crawler.sources.push(broken);
    crawler.sources.push(healthy);
    pipeline.crawlers.create(&crawler).await.unwrap();

    let ctx = pipeline.engine.create_run(crawler.id).await.unwrap();
    let run = pipeline.engine.execute(ctx).await;

    assert_eq!(run.status, CrawlRunStatus::Completed);
    assert_eq!(run.items_processed, 1);

    let stored = pipeline
        .crawlers
        .find_by_id(crawler.id)
        .await
        .unwrap()
        .unwrap();
    // 信息源按创建顺序排列：先失败源，后健康源
    let broken_status = stored.sources[0].last_status.as_deref().unwrap();
    let healthy_status = stored.sources[1].last_status.as_deref().unwrap();
    assert!(broken_status.starts_with("error:"), "got {broken_status}");
    assert!(healthy_status.starts_with("ok:"), "got {healthy_status}");
}

#[tokio::test]
async fn item_ceiling_caps_a_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(FEED, "application/rss+xml"))
        .mount(&server)
        .await;

    let db = setup_db().await;
    let pipeline = build_pipeline(db, 2);

    let mut crawler = build_crawler(0.0, &["rust"]);
    crawler
        .sources
        .push(rss_source(crawler.id, &format!("{}/feed.xml", server.uri())));
    pipeline.crawlers.create(&crawler).await.unwrap();

    let ctx = pipeline.engine.create_run(crawler.id).await.unwrap();
    let run = pipeline.engine.execute(ctx).await;

    assert_eq!(run.status, CrawlRunStatus::Completed);
    assert_eq!(run.items_found, 2);
}

#[tokio::test]
async fn unknown_crawler_cannot_start_a_run() {
    let db = setup_db().await;
    let pipeline = build_pipeline(db, 100);

    let result = pipeline.engine.create_run(uuid::Uuid::new_v4()).await;
    assert!(result.is_err());
}
