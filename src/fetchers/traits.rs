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

use crate::domain::models::crawler::Source;
use crate::domain::models::fetched_item::FetchedItem;
use async_trait::async_trait;
use thiserror::Error;

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 订阅源解析失败
    #[error("Feed parse error: {0}")]
    FeedParse(String),
    /// 源地址无效
    #[error("Invalid source url: {0}")]
    InvalidUrl(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl FetchError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 如果错误是可重试的则返回true，否则返回false
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            _ => false,
        }
    }
}

/// 信息源抓取器特质
///
/// 将一个信息源转换为有界的规范化条目序列。实现必须是无状态的：
/// 对同一信息源重复调用产生等价的新序列。
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// 抓取信息源，最多返回limit个条目
    async fn fetch(&self, source: &Source, limit: usize) -> Result<Vec<FetchedItem>, FetchError>;

    /// 获取抓取器名称
    fn name(&self) -> &str;
}
