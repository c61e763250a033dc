// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawler::{Source, SourceType};
use crate::domain::models::fetched_item::FetchedItem;
use crate::fetchers::traits::{FetchError, SourceFetcher};
use std::sync::Arc;
use tracing::debug;

/// 抓取器路由
///
/// 根据信息源类型分发到对应的抓取器
pub struct FetcherRouter {
    rss: Arc<dyn SourceFetcher>,
    web: Arc<dyn SourceFetcher>,
}

impl FetcherRouter {
    /// 创建新的抓取器路由实例
    pub fn new(rss: Arc<dyn SourceFetcher>, web: Arc<dyn SourceFetcher>) -> Self {
        Self { rss, web }
    }

    /// 抓取信息源
    ///
    /// # 参数
    ///
    /// * `source` - 信息源
    /// * `limit` - 条目数上限
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<FetchedItem>)` - 抓取到的条目
    /// * `Err(FetchError)` - 抓取过程中出现的错误
    pub async fn fetch(
        &self,
        source: &Source,
        limit: usize,
    ) -> Result<Vec<FetchedItem>, FetchError> {
        let fetcher = match source.source_type {
            SourceType::Rss => &self.rss,
            SourceType::Web => &self.web,
        };
        debug!(source_url = %source.url, fetcher = fetcher.name(), limit, "Dispatching fetch");
        fetcher.fetch(source, limit).await
    }
}
