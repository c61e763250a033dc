// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 爬虫配置实体
///
/// 一个爬虫代表一条独立的内容发现流水线，聚合了关键词集合、
/// 信息源集合以及准入阈值。由管理端维护，调度器和运行引擎只读。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crawler {
    /// 爬虫唯一标识符
    pub id: Uuid,
    /// 爬虫名称
    pub name: String,
    /// 是否激活，未激活的爬虫不会被调度
    pub is_active: bool,
    /// 准入阈值（0-1），相关性得分低于该值的条目被直接丢弃
    pub min_match_score: f64,
    /// 上次运行时间，调度器据此判断是否到期
    pub last_run_at: Option<DateTime<FixedOffset>>,
    /// 关键词集合，按创建顺序排列
    pub keywords: Vec<Keyword>,
    /// 信息源集合，按创建顺序排列
    pub sources: Vec<Source>,
}

/// 信息源实体
///
/// 爬虫监控的单个RSS源或网站根地址
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// 信息源唯一标识符
    pub id: Uuid,
    /// 所属爬虫ID
    pub crawler_id: Uuid,
    /// 源地址
    pub url: String,
    /// 源类型，决定使用哪个抓取器
    pub source_type: SourceType,
    /// 是否启用，禁用的源在运行中被跳过
    pub enabled: bool,
    /// 网页抓取的总页面预算（硬上限）
    pub max_pages: i32,
    /// 链接跟随深度上限
    pub max_depth: i32,
    /// 是否跟随链接，false时无论深度只抓取根页面
    pub follow_links: bool,
    /// 上次抓取的诊断信息（自由文本）
    pub last_status: Option<String>,
    /// 创建时间，决定运行时的稳定遍历顺序
    pub created_at: DateTime<FixedOffset>,
}

/// 信息源类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// RSS/Atom订阅源
    #[default]
    Rss,
    /// 网站（同域有界爬取）
    Web,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceType::Rss => write!(f, "rss"),
            SourceType::Web => write!(f, "web"),
        }
    }
}

impl FromStr for SourceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rss" => Ok(SourceType::Rss),
            "web" => Ok(SourceType::Web),
            _ => Err(()),
        }
    }
}

/// 关键词实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    /// 关键词唯一标识符
    pub id: Uuid,
    /// 所属爬虫ID
    pub crawler_id: Uuid,
    /// 关键词文本
    pub term: String,
    /// 关键词来源
    pub origin: KeywordOrigin,
}

/// 关键词来源枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeywordOrigin {
    /// 人工维护
    #[default]
    Manual,
    /// 系统派生
    Derived,
}

impl fmt::Display for KeywordOrigin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeywordOrigin::Manual => write!(f, "manual"),
            KeywordOrigin::Derived => write!(f, "derived"),
        }
    }
}

impl FromStr for KeywordOrigin {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(KeywordOrigin::Manual),
            "derived" => Ok(KeywordOrigin::Derived),
            _ => Err(()),
        }
    }
}

impl Crawler {
    /// 返回启用的信息源，按创建顺序排列
    pub fn enabled_sources(&self) -> Vec<&Source> {
        let mut sources: Vec<&Source> = self.sources.iter().filter(|s| s.enabled).collect();
        sources.sort_by_key(|s| s.created_at);
        sources
    }
}
