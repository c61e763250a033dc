// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawler::Crawler;
use crate::domain::repositories::crawl_run_repository::CrawlRunRepository;
use crate::domain::repositories::crawler_repository::CrawlerRepository;
use crate::domain::repositories::lease_repository::LeaseRepository;
use crate::domain::repositories::moderation_repository::ModerationRepository;
use crate::domain::repositories::post_repository::PostRepository;
use crate::engine::run_engine::RunEngine;
use crate::utils::errors::SchedulerError;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// 爬取调度器
///
/// 周期性找出到期的爬虫并为每个爬虫派发至多一个并发运行。
/// 互斥靠爬虫级TTL租约保证，对多副本部署同样成立：
/// 租约表是唯一的协调点，副本之间不共享内存状态。
pub struct CrawlScheduler<C, R, M, P, L>
where
    C: CrawlerRepository + 'static,
    R: CrawlRunRepository + 'static,
    M: ModerationRepository + 'static,
    P: PostRepository + 'static,
    L: LeaseRepository + 'static,
{
    crawlers: Arc<C>,
    runs: Arc<R>,
    leases: Arc<L>,
    engine: Arc<RunEngine<C, R, M, P>>,
    /// 调度间隔，同时也是爬虫到期判定的回看窗口
    interval: Duration,
    /// 租约TTL，应大于一次运行的最长预期时长
    lease_ttl: Duration,
    /// 本调度器副本的持有者标识
    instance_id: Uuid,
}

impl<C, R, M, P, L> CrawlScheduler<C, R, M, P, L>
where
    C: CrawlerRepository + 'static,
    R: CrawlRunRepository + 'static,
    M: ModerationRepository + 'static,
    P: PostRepository + 'static,
    L: LeaseRepository + 'static,
{
    /// 创建新的调度器实例
    pub fn new(
        crawlers: Arc<C>,
        runs: Arc<R>,
        leases: Arc<L>,
        engine: Arc<RunEngine<C, R, M, P>>,
        interval: Duration,
        lease_ttl: Duration,
    ) -> Self {
        Self {
            crawlers,
            runs,
            leases,
            engine,
            interval,
            lease_ttl,
            instance_id: Uuid::new_v4(),
        }
    }

    /// 启动调度循环后台任务
    ///
    /// 节奏是处理完成之后再等待interval，而非固定频率：
    /// 总延迟包含运行本身的耗时
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(instance_id = %self.instance_id, "Crawl scheduler started");
            loop {
                if let Err(e) = self.tick().await {
                    // Tick级错误提前结束本轮，下一Tick重试
                    error!(error = %e, "Scheduler tick failed");
                }
                sleep(
                    self.interval
                        .to_std()
                        .unwrap_or(std::time::Duration::from_secs(60)),
                )
                .await;
            }
        })
    }

    /// 执行一个调度Tick
    ///
    /// 选出到期爬虫并逐个派发；单个爬虫的失败不影响
    /// 同一Tick内的其他爬虫
    pub async fn tick(&self) -> Result<(), SchedulerError> {
        let now = Utc::now().fixed_offset();
        let due = self.crawlers.find_due(now, self.interval).await?;

        if due.is_empty() {
            debug!("No crawlers due");
            return Ok(());
        }
        info!(count = due.len(), "Dispatching due crawlers");

        for crawler in due {
            let crawler_id = crawler.id;
            if let Err(e) = self.dispatch(crawler).await {
                error!(%crawler_id, error = %e, "Crawler dispatch failed");
            }
        }

        Ok(())
    }

    /// 为单个爬虫派发一次运行
    ///
    /// 租约获取失败（他处持有）时静默跳过；获取成功后
    /// 无论执行结果如何都释放租约
    async fn dispatch(&self, crawler: Crawler) -> Result<(), SchedulerError> {
        let acquired = self
            .leases
            .acquire(crawler.id, self.instance_id, self.lease_ttl)
            .await?;
        if !acquired {
            debug!(crawler_id = %crawler.id, "Lease held elsewhere, skipping");
            return Ok(());
        }

        let outcome = self.run_guarded(&crawler).await;

        // 所有退出路径上都释放租约，包括执行出错
        if let Err(e) = self
            .leases
            .release(crawler.id, self.instance_id)
            .await
        {
            warn!(crawler_id = %crawler.id, error = %e, "Failed to release lease");
        }

        outcome
    }

    /// 租约保护下的运行执行
    async fn run_guarded(&self, crawler: &Crawler) -> Result<(), SchedulerError> {
        // 纵深防御：租约之外再检查是否已有RUNNING运行
        if self.runs.has_running(crawler.id).await? {
            warn!(crawler_id = %crawler.id, "Run already in progress, skipping");
            return Ok(());
        }

        let ctx = match self.engine.create_run(crawler.id).await {
            Ok(ctx) => ctx,
            Err(e) => {
                // 运行级错误只影响该爬虫本次派发
                error!(crawler_id = %crawler.id, error = %e, "Failed to create run");
                return Ok(());
            }
        };

        let run = self.engine.execute(ctx).await;
        info!(
            crawler_id = %crawler.id,
            run_id = %run.id,
            status = %run.status,
            items_found = run.items_found,
            items_processed = run.items_processed,
            "Run finished"
        );

        self.crawlers
            .touch_last_run(crawler.id, Utc::now().fixed_offset())
            .await?;
        Ok(())
    }
}
