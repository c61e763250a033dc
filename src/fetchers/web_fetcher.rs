// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawler::Source;
use crate::domain::models::fetched_item::FetchedItem;
use crate::fetchers::traits::{FetchError, SourceFetcher};
use crate::utils::url_norm;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static META_DESC_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static OG_IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());
static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").unwrap());
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// 正文节选的段落数与长度上限
const EXCERPT_PARAGRAPHS: usize = 3;
const EXCERPT_MAX_CHARS: usize = 1500;

/// 每页重试次数与批次间隔
const PAGE_RETRIES: u32 = 2;
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// 网页抓取器
///
/// 从根地址做同域遍历：`max_pages` 是总页面预算（硬上限），
/// `max_depth` 限制链接跟随深度，`follow_links=false` 时
/// 无论深度只抓取根页面。并发上限是对目标站点的礼貌约束，
/// 与系统整体负载无关。
pub struct WebFetcher {
    client: reqwest::Client,
    concurrency: usize,
}

/// 单个页面的提取结果
struct ExtractedPage {
    item: FetchedItem,
    links: Vec<Url>,
}

impl WebFetcher {
    /// 创建新的网页抓取器实例
    pub fn new(client: reqwest::Client, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
        }
    }

    /// 带有界重试地抓取单个页面
    async fn fetch_page(&self, url: Url, depth: usize) -> Result<(Url, String, usize), FetchError> {
        let mut last_err = FetchError::Other("no attempt made".to_string());
        for attempt in 0..=PAGE_RETRIES {
            if attempt > 0 {
                sleep(RETRY_BACKOFF * attempt).await;
            }
            let result = async {
                let response = self.client.get(url.clone()).send().await?;
                let text = response.error_for_status()?.text().await?;
                Ok::<String, FetchError>(text)
            }
            .await;

            match result {
                Ok(text) => return Ok((url, text, depth)),
                Err(e) if e.is_retryable() && attempt < PAGE_RETRIES => {
                    debug!(url = %url, attempt, error = %e, "Retrying page fetch");
                    last_err = e;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err)
    }

    /// 从HTML中提取页面内容与同域链接
    ///
    /// 同步执行，解析结果不跨越await点
    fn extract_page(html: &str, page_url: &Url, site_host: &str) -> ExtractedPage {
        let document = Html::parse_document(html);

        let title = document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|el| collect_text(&el))
            .filter(|t| !t.is_empty())
            .or_else(|| {
                document
                    .select(&H1_SELECTOR)
                    .next()
                    .map(|el| collect_text(&el))
                    .filter(|t| !t.is_empty())
            });

        let paragraphs: Vec<String> = document
            .select(&PARAGRAPH_SELECTOR)
            .map(|el| collect_text(&el))
            .filter(|t| !t.is_empty())
            .collect();

        let summary = document
            .select(&META_DESC_SELECTOR)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| paragraphs.first().cloned());

        let image_url = document
            .select(&OG_IMAGE_SELECTOR)
            .next()
            .and_then(|el| el.value().attr("content"))
            .or_else(|| {
                document
                    .select(&IMG_SELECTOR)
                    .next()
                    .and_then(|el| el.value().attr("src"))
            })
            .and_then(|src| url_norm::resolve_url(page_url, src).ok())
            .map(|u| u.to_string());

        let mut content = paragraphs
            .iter()
            .take(EXCERPT_PARAGRAPHS)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n\n");
        if content.len() > EXCERPT_MAX_CHARS {
            let mut end = EXCERPT_MAX_CHARS;
            while !content.is_char_boundary(end) {
                end -= 1;
            }
            content.truncate(end);
        }

        let links = document
            .select(&LINK_SELECTOR)
            .filter_map(|el| el.value().attr("href"))
            .filter(|href| {
                !href.starts_with('#')
                    && !href.starts_with("mailto:")
                    && !href.starts_with("javascript:")
            })
            .filter_map(|href| url_norm::resolve_url(page_url, href).ok())
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .filter(|u| u.host_str().is_some_and(|h| h.eq_ignore_ascii_case(site_host)))
            .collect();

        ExtractedPage {
            item: FetchedItem {
                url: page_url.to_string(),
                title,
                summary,
                content: (!content.is_empty()).then_some(content),
                image_url,
                author: None,
                source_name: page_url.host_str().map(|h| h.to_string()),
                language: None,
                published_at: None,
            },
            links,
        }
    }
}

/// 收集元素下的全部文本并压缩空白
fn collect_text(el: &scraper::ElementRef) -> String {
    el.text().collect::<Vec<_>>().join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl SourceFetcher for WebFetcher {
    async fn fetch(&self, source: &Source, limit: usize) -> Result<Vec<FetchedItem>, FetchError> {
        let root = Url::parse(&source.url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", source.url, e)))?;
        let site_host = root
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl(format!("{}: no host", source.url)))?
            .to_lowercase();

        // follow_links=false 时无论深度只抓取根页面
        let page_budget = if source.follow_links {
            source.max_pages.max(1) as usize
        } else {
            1
        };
        let max_depth = if source.follow_links {
            source.max_depth.max(0) as usize
        } else {
            0
        };

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(url_norm::normalize(root.as_str()));
        let mut frontier: Vec<(Url, usize)> = vec![(root, 0)];
        let mut items: Vec<FetchedItem> = Vec::new();
        let mut pages_attempted = 0usize;

        while !frontier.is_empty() && pages_attempted < page_budget && items.len() < limit {
            let batch_size = frontier.len().min(page_budget - pages_attempted);
            let batch: Vec<(Url, usize)> = frontier.drain(..batch_size).collect();
            pages_attempted += batch.len();

            let results: Vec<Result<(Url, String, usize), FetchError>> =
                stream::iter(batch)
                    .map(|(url, depth)| self.fetch_page(url, depth))
                    .buffer_unordered(self.concurrency)
                    .collect()
                    .await;

            for result in results {
                let (page_url, html, depth) = match result {
                    Ok(fetched) => fetched,
                    Err(e) => {
                        warn!(source_url = %source.url, error = %e, "Page fetch failed, skipping");
                        continue;
                    }
                };

                let extracted = Self::extract_page(&html, &page_url, &site_host);

                if items.len() < limit {
                    items.push(extracted.item);
                }

                if depth < max_depth {
                    for link in extracted.links {
                        let canonical = url_norm::normalize(link.as_str());
                        if visited.insert(canonical) {
                            frontier.push((link, depth + 1));
                        }
                    }
                }
            }
        }

        debug!(
            source_url = %source.url,
            pages = pages_attempted,
            items = items.len(),
            "Web crawl finished"
        );
        Ok(items)
    }

    fn name(&self) -> &str {
        "web"
    }
}
