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
use crate::domain::models::crawler::Crawler;
use crate::domain::models::fetched_item::FetchedItem;
use crate::domain::models::moderation_item::{ModerationItem, ModerationStatus};
use crate::domain::repositories::crawl_run_repository::CrawlRunRepository;
use crate::domain::repositories::crawler_repository::CrawlerRepository;
use crate::domain::repositories::moderation_repository::ModerationRepository;
use crate::domain::repositories::post_repository::PostRepository;
use crate::domain::services::moderation_service::ModerationService;
use crate::domain::services::scoring_service::Scorer;
use crate::fetchers::router::FetcherRouter;
use crate::utils::errors::{truncate_error, RunError};
use crate::utils::url_norm;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// 运行错误信息的最大持久化长度
const MAX_ERROR_LEN: usize = 1000;

/// 一次运行的执行上下文
///
/// 由 `create_run` 装配：运行记录加上爬虫配置快照
pub struct RunContext {
    pub run: CrawlRun,
    pub crawler: Crawler,
}

/// 爬取运行引擎
///
/// 端到端驱动一次运行：信息源 → 抓取 → 去重 → 评分 → 入队 → 收尾，
/// 并保证运行必然落在终态（COMPLETED或FAILED）。
pub struct RunEngine<C, R, M, P>
where
    C: CrawlerRepository,
    R: CrawlRunRepository,
    M: ModerationRepository,
    P: PostRepository,
{
    crawlers: Arc<C>,
    runs: Arc<R>,
    moderation: Arc<ModerationService<M, P>>,
    fetchers: Arc<FetcherRouter>,
    scorer: Arc<dyn Scorer>,
    /// 单次运行的全局条目上限，跨全部信息源生效
    max_items_per_run: usize,
}

impl<C, R, M, P> RunEngine<C, R, M, P>
where
    C: CrawlerRepository,
    R: CrawlRunRepository,
    M: ModerationRepository,
    P: PostRepository,
{
    /// 创建新的运行引擎实例
    pub fn new(
        crawlers: Arc<C>,
        runs: Arc<R>,
        moderation: Arc<ModerationService<M, P>>,
        fetchers: Arc<FetcherRouter>,
        scorer: Arc<dyn Scorer>,
        max_items_per_run: usize,
    ) -> Self {
        Self {
            crawlers,
            runs,
            moderation,
            fetchers,
            scorer,
            max_items_per_run,
        }
    }

    /// 创建一次新运行
    ///
    /// 加载爬虫配置（关键词、阈值、信息源）并插入PENDING运行记录
    pub async fn create_run(&self, crawler_id: Uuid) -> Result<RunContext, RunError> {
        let crawler = self
            .crawlers
            .find_by_id(crawler_id)
            .await?
            .ok_or(RunError::CrawlerNotFound(crawler_id))?;

        let run = CrawlRun::new(crawler_id);
        self.runs.insert(&run).await?;

        Ok(RunContext { run, crawler })
    }

    /// 执行一次运行直至终态
    ///
    /// 信息源级失败记录在该源的 `last_status` 上并继续；
    /// 引擎级失败将运行标记为FAILED。两种情况下返回的运行
    /// 都已处于终态。
    #[instrument(skip(self, ctx), fields(run_id = %ctx.run.id, crawler_id = %ctx.crawler.id))]
    pub async fn execute(&self, ctx: RunContext) -> CrawlRun {
        let RunContext { mut run, crawler } = ctx;

        run.start();
        if let Err(e) = self.runs.update(&run).await {
            error!(error = %e, "Failed to mark run as running");
            self.finalize_run(&mut run, Err(RunError::from(e))).await;
            return run;
        }

        info!(sources = crawler.sources.len(), keywords = crawler.keywords.len(), "Run started");

        let result = self.process_sources(&mut run, &crawler).await;
        self.finalize_run(&mut run, result).await;
        run
    }

    /// 按稳定顺序遍历启用的信息源
    async fn process_sources(
        &self,
        run: &mut CrawlRun,
        crawler: &Crawler,
    ) -> Result<(), RunError> {
        // 零信息源或零关键词不是错误：运行立即以零计数完成
        if crawler.keywords.is_empty() {
            info!("Crawler has no keywords, completing run with zero counts");
            return Ok(());
        }

        let mut budget = self.max_items_per_run;

        for source in crawler.enabled_sources() {
            // 全局条目上限命中后对剩余信息源一并停止抓取
            if budget == 0 {
                info!("Per-run item ceiling reached, skipping remaining sources");
                break;
            }

            let items = match self.fetchers.fetch(source, budget).await {
                Ok(items) => {
                    self.record_source_status(
                        source.id,
                        &format!("ok: {} items at {}", items.len(), Utc::now().to_rfc3339()),
                    )
                    .await;
                    items
                }
                Err(e) => {
                    // 信息源级失败不中止运行，其余源照常执行
                    warn!(source_url = %source.url, error = %e, "Source fetch failed");
                    self.record_source_status(
                        source.id,
                        &truncate_error(&format!("error: {}", e), MAX_ERROR_LEN),
                    )
                    .await;
                    continue;
                }
            };

            for item in items {
                if budget == 0 {
                    break;
                }
                budget -= 1;
                run.items_found += 1;

                match self.ingest_item(crawler, item).await {
                    Ok(true) => run.items_processed += 1,
                    Ok(false) => {}
                    Err(e) => {
                        // 条目级失败丢弃该条目，运行继续
                        warn!(error = %e, "Item ingest failed, dropping item");
                    }
                }
            }
        }

        Ok(())
    }

    /// 单个条目的采集流水线：规范化 → 去重 → 评分 → 阈值闸门 → 入队
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 条目实际入队
    /// * `Ok(false)` - 条目被去重或阈值丢弃
    async fn ingest_item(&self, crawler: &Crawler, item: FetchedItem) -> Result<bool, RunError> {
        let url = url_norm::normalize(&item.url);
        let url_hash = url_norm::url_hash(&item.url);

        if self
            .moderation
            .exists(crawler.id, &url_hash)
            .await
            .map_err(|e| RunError::Internal(e.to_string()))?
        {
            return Ok(false);
        }

        let score = self
            .scorer
            .score(
                item.title.as_deref().unwrap_or_default(),
                item.summary.as_deref().unwrap_or_default(),
                item.content.as_deref().unwrap_or_default(),
                &crawler.keywords,
            )
            .await;

        // 未达阈值的条目静默丢弃，不会以任何状态持久化
        if score < crawler.min_match_score {
            return Ok(false);
        }

        let moderation_item = ModerationItem {
            id: Uuid::new_v4(),
            crawler_id: crawler.id,
            url,
            url_hash,
            title: item.title,
            summary: item.summary,
            content: item.content,
            image_url: item.image_url,
            author: item.author,
            source_name: item.source_name,
            language: item.language,
            score,
            status: ModerationStatus::Pending,
            discovered_at: Utc::now().fixed_offset(),
            decided_at: None,
            decided_by: None,
        };

        self.moderation
            .queue_post(&moderation_item)
            .await
            .map_err(|e| RunError::Internal(e.to_string()))
    }

    /// 回写信息源诊断信息，失败只记录日志
    async fn record_source_status(&self, source_id: Uuid, status: &str) {
        if let Err(e) = self.crawlers.update_source_status(source_id, status).await {
            warn!(%source_id, error = %e, "Failed to record source status");
        }
    }

    /// 收尾：运行必然落在终态
    async fn finalize_run(&self, run: &mut CrawlRun, result: Result<(), RunError>) {
        run.completed_at = Some(Utc::now().fixed_offset());
        match result {
            Ok(()) => {
                run.status = CrawlRunStatus::Completed;
                info!(
                    items_found = run.items_found,
                    items_processed = run.items_processed,
                    "Run completed"
                );
            }
            Err(e) => {
                run.status = CrawlRunStatus::Failed;
                run.error = Some(truncate_error(&e.to_string(), MAX_ERROR_LEN));
                error!(error = %e, "Run failed");
            }
        }

        if let Err(e) = self.runs.update(run).await {
            error!(run_id = %run.id, error = %e, "Failed to persist terminal run status");
        }
    }
}
