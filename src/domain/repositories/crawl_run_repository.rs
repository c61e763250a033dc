// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl_run::CrawlRun;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 爬取运行仓库特质
#[async_trait]
pub trait CrawlRunRepository: Send + Sync {
    /// 插入新运行记录
    async fn insert(&self, run: &CrawlRun) -> Result<(), RepositoryError>;
    /// 更新运行记录（状态转换与计数回写）
    async fn update(&self, run: &CrawlRun) -> Result<(), RepositoryError>;
    /// 根据ID查找运行记录
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CrawlRun>, RepositoryError>;
    /// 判断某爬虫当前是否存在RUNNING状态的运行
    async fn has_running(&self, crawler_id: Uuid) -> Result<bool, RepositoryError>;
}
