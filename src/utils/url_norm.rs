// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sha2::{Digest, Sha256};
use url::{ParseError, Url};

/// 需要剥离的跟踪查询参数
///
/// `utm_` 为前缀匹配，其余为精确匹配
const TRACKING_PARAMS: [&str; 5] = ["fbclid", "gclid", "ref", "source", "campaign"];

/// 规范化URL
///
/// 剥离跟踪参数、折叠末尾斜杠并统一主机名大小写后重新序列化。
/// 非法输入不会报错，原样返回输入字符串。
pub fn normalize(raw: &str) -> String {
    let mut url = match Url::parse(raw.trim()) {
        Ok(url) => url,
        Err(_) => return raw.to_string(),
    };

    // Url::parse already lowercases the host; filter out tracking params
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| {
            !key.starts_with("utm_") && !TRACKING_PARAMS.contains(&key.as_ref())
        })
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        let query = kept
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    k.clone()
                } else {
                    format!("{}={}", k, v)
                }
            })
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));
    }

    // 折叠单个末尾斜杠，根路径保持为 "/"
    let path = url.path().to_string();
    if path.len() > 1 {
        if let Some(stripped) = path.strip_suffix('/') {
            url.set_path(stripped);
        }
    }

    url.to_string()
}

/// 计算URL的稳定哈希标识
///
/// 对规范化后的URL取SHA-256并十六进制编码，
/// 用于去重查找和Post的幂等Upsert键。
pub fn url_hash(raw: &str) -> String {
    let normalized = normalize(raw);
    let digest = Sha256::digest(normalized.as_bytes());
    hex::encode(digest)
}

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}
