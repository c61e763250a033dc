// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::moderation_item::ModerationItem;

/// 发布内容实体
///
/// 审核通过后晋升产生的发布产物，以url_hash为幂等键：
/// 同一url_hash重复晋升只会得到一条Post（Upsert更新原记录）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// 发布内容唯一标识符
    pub id: Uuid,
    /// 规范化URL哈希，全局唯一的Upsert键
    pub url_hash: String,
    /// 原始URL
    pub url: String,
    /// 标题
    pub title: Option<String>,
    /// 摘要
    pub summary: Option<String>,
    /// 正文
    pub content: Option<String>,
    /// 首图URL
    pub image_url: Option<String>,
    /// 作者
    pub author: Option<String>,
    /// 来源名称
    pub source_name: Option<String>,
    /// 语言
    pub language: Option<String>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间，重复晋升时刷新
    pub updated_at: DateTime<FixedOffset>,
}

impl From<&ModerationItem> for Post {
    fn from(item: &ModerationItem) -> Self {
        let now = Utc::now().fixed_offset();
        Self {
            id: Uuid::new_v4(),
            url_hash: item.url_hash.clone(),
            url: item.url.clone(),
            title: item.title.clone(),
            summary: item.summary.clone(),
            content: item.content.clone(),
            image_url: item.image_url.clone(),
            author: item.author.clone(),
            source_name: item.source_name.clone(),
            language: item.language.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}
