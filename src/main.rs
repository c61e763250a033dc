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

use axum::Extension;
use chrono::Duration;
use curatrs::config::settings::Settings;
use curatrs::domain::services::moderation_service::ModerationService;
use curatrs::domain::services::scoring_service::{KeywordScorer, Scorer};
use curatrs::engine::run_engine::RunEngine;
use curatrs::fetchers::router::FetcherRouter;
use curatrs::fetchers::rss_fetcher::RssFetcher;
use curatrs::fetchers::traits::SourceFetcher;
use curatrs::fetchers::web_fetcher::WebFetcher;
use curatrs::infrastructure::database::connection;
use curatrs::infrastructure::repositories::crawl_run_repo_impl::CrawlRunRepositoryImpl;
use curatrs::infrastructure::repositories::crawler_repo_impl::CrawlerRepositoryImpl;
use curatrs::infrastructure::repositories::lease_repo_impl::LeaseRepositoryImpl;
use curatrs::infrastructure::repositories::moderation_repo_impl::ModerationRepositoryImpl;
use curatrs::infrastructure::repositories::post_repo_impl::PostRepositoryImpl;
use curatrs::presentation::routes;
use curatrs::scheduler::scheduler::CrawlScheduler;
use curatrs::utils::telemetry;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting curatrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize repositories
    let crawler_repo = Arc::new(CrawlerRepositoryImpl::new(db.clone()));
    let run_repo = Arc::new(CrawlRunRepositoryImpl::new(db.clone()));
    let moderation_repo = Arc::new(ModerationRepositoryImpl::new(db.clone()));
    let post_repo = Arc::new(PostRepositoryImpl::new(db.clone()));
    let lease_repo = Arc::new(LeaseRepositoryImpl::new(db.clone()));

    // 5. Initialize fetchers
    let client = reqwest::Client::builder()
        .user_agent(settings.crawl.user_agent.clone())
        .timeout(std::time::Duration::from_secs(settings.crawl.request_timeout))
        .build()?;

    let rss: Arc<dyn SourceFetcher> = Arc::new(RssFetcher::new(client.clone()));
    let web: Arc<dyn SourceFetcher> = Arc::new(WebFetcher::new(
        client,
        settings.crawl.fetch_concurrency,
    ));
    let fetchers = Arc::new(FetcherRouter::new(rss, web));

    // 6. Initialize services and engine
    let scorer: Arc<dyn Scorer> = Arc::new(KeywordScorer::new());
    let moderation_service = Arc::new(ModerationService::new(
        moderation_repo.clone(),
        post_repo.clone(),
    ));
    let engine = Arc::new(RunEngine::new(
        crawler_repo.clone(),
        run_repo.clone(),
        moderation_service.clone(),
        fetchers,
        scorer,
        settings.crawl.max_items_per_run,
    ));

    // 7. Start scheduler
    let scheduler = Arc::new(CrawlScheduler::new(
        crawler_repo.clone(),
        run_repo.clone(),
        lease_repo.clone(),
        engine,
        Duration::minutes(settings.scheduler.interval_minutes),
        Duration::seconds(settings.scheduler.lease_ttl_seconds),
    ));
    scheduler.start();
    info!("Crawl scheduler started");

    // 8. Start HTTP server
    let app = routes::routes()
        .layer(Extension(moderation_service))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
