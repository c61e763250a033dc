// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawler::Crawler;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset};
use uuid::Uuid;

/// 爬虫配置仓库特质
///
/// 爬虫配置归管理端所有，核心只读取配置并回写
/// `last_run_at` 与信息源诊断信息
#[async_trait]
pub trait CrawlerRepository: Send + Sync {
    /// 创建爬虫及其关键词和信息源
    async fn create(&self, crawler: &Crawler) -> Result<(), RepositoryError>;
    /// 根据ID加载爬虫（含关键词与信息源，按创建顺序）
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Crawler>, RepositoryError>;
    /// 查询到期待运行的爬虫：激活且从未运行或上次运行早于间隔之前
    async fn find_due(
        &self,
        now: DateTime<FixedOffset>,
        interval: Duration,
    ) -> Result<Vec<Crawler>, RepositoryError>;
    /// 回写上次运行时间
    async fn touch_last_run(
        &self,
        id: Uuid,
        at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError>;
    /// 回写信息源的诊断信息
    async fn update_source_status(
        &self,
        source_id: Uuid,
        status: &str,
    ) -> Result<(), RepositoryError>;
}
