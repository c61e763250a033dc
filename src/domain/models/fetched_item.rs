// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// 抓取条目
///
/// 抓取器产出的统一中间格式，尚未去重、评分或持久化
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchedItem {
    /// 条目URL（原始，未规范化）
    pub url: String,
    /// 标题
    pub title: Option<String>,
    /// 摘要
    pub summary: Option<String>,
    /// 正文节选
    pub content: Option<String>,
    /// 首图URL（绝对地址）
    pub image_url: Option<String>,
    /// 作者
    pub author: Option<String>,
    /// 来源名称（订阅源标题或站点主机名）
    pub source_name: Option<String>,
    /// 语言
    pub language: Option<String>,
    /// 发布时间
    pub published_at: Option<DateTime<FixedOffset>>,
}
