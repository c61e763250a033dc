// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawler::Source;
use crate::domain::models::fetched_item::FetchedItem;
use crate::fetchers::traits::{FetchError, SourceFetcher};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// RSS抓取器
///
/// 解析RSS/Atom订阅源并将条目1:1映射为规范化条目。
/// 没有可解析链接的条目被丢弃；解析失败向调用方抛出，
/// 由运行引擎按信息源捕获。
pub struct RssFetcher {
    client: reqwest::Client,
}

impl RssFetcher {
    /// 创建新的RSS抓取器实例
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// 解析订阅源字节流并映射为条目
    fn parse_feed(bytes: &[u8], limit: usize) -> Result<Vec<FetchedItem>, FetchError> {
        let feed = feed_rs::parser::parse(bytes)
            .map_err(|e| FetchError::FeedParse(e.to_string()))?;

        let feed_title = feed.title.as_ref().map(|t| t.content.clone());
        let feed_language = feed.language.clone();

        let items = feed
            .entries
            .into_iter()
            .filter_map(|entry| {
                // 链接不可解析的条目直接丢弃
                let url = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()))?;

                let published_at = entry
                    .published
                    .or(entry.updated)
                    .map(|dt| dt.fixed_offset());

                let image_url = entry
                    .media
                    .first()
                    .and_then(|m| {
                        m.thumbnails
                            .first()
                            .map(|t| t.image.uri.clone())
                            .or_else(|| {
                                m.content
                                    .first()
                                    .and_then(|c| c.url.as_ref())
                                    .map(|u| u.to_string())
                            })
                    });

                Some(FetchedItem {
                    url,
                    title: entry.title.map(|t| clean_text(&t.content)),
                    summary: entry.summary.map(|s| clean_text(&s.content)),
                    content: entry
                        .content
                        .and_then(|c| c.body)
                        .map(|b| clean_text(&b)),
                    image_url,
                    author: entry
                        .authors
                        .first()
                        .map(|a| a.name.clone())
                        .filter(|n| !n.trim().is_empty()),
                    source_name: feed_title.clone(),
                    language: feed_language.clone(),
                    published_at,
                })
            })
            .take(limit)
            .collect();

        Ok(items)
    }
}

/// 去除HTML标签并解码实体
///
/// 订阅源的标题和摘要经常携带内嵌HTML
fn clean_text(raw: &str) -> String {
    let stripped = TAG_REGEX.replace_all(raw, " ");
    let decoded = html_escape::decode_html_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl SourceFetcher for RssFetcher {
    async fn fetch(&self, source: &Source, limit: usize) -> Result<Vec<FetchedItem>, FetchError> {
        debug!(url = %source.url, "Fetching RSS source");
        let response = self.client.get(&source.url).send().await?;
        let bytes = response.error_for_status()?.bytes().await?;
        Self::parse_feed(&bytes, limit)
    }

    fn name(&self) -> &str {
        "rss"
    }
}
