// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawler::Keyword;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::RwLock;

/// 相关性评分特质
///
/// 采集流水线的准入闸门。实现必须对相同输入返回相同得分，
/// 得分落在[0,1]内并可与爬虫的 `min_match_score` 用 `>=` 比较。
/// 具体加权方式由实现决定（词法匹配、生成式模型加成等均可），
/// 流水线只依赖阈值闸门这一契约。
#[async_trait]
pub trait Scorer: Send + Sync {
    /// 计算条目对关键词集合的相关性得分
    async fn score(
        &self,
        title: &str,
        summary: &str,
        content: &str,
        keywords: &[Keyword],
    ) -> f64;
}

/// 字段权重：标题命中最强，摘要次之，正文最弱
const TITLE_WEIGHT: f64 = 1.0;
const SUMMARY_WEIGHT: f64 = 0.7;
const CONTENT_WEIGHT: f64 = 0.4;

/// 关键词评分器
///
/// 默认的纯词法实现：每个关键词取其在标题/摘要/正文中的
/// 最强命中权重，再对全部关键词取平均。词边界模式按词条
/// 缓存，同一词条跨运行只编译一次
pub struct KeywordScorer {
    patterns: RwLock<HashMap<String, Regex>>,
}

impl KeywordScorer {
    pub fn new() -> Self {
        Self {
            patterns: RwLock::new(HashMap::new()),
        }
    }

    /// 单个关键词的命中权重
    fn keyword_weight(&self, term: &str, title: &str, summary: &str, content: &str) -> f64 {
        if term.is_empty() {
            return 0.0;
        }
        let re = self.pattern(term);

        let mut weight: f64 = 0.0;
        if re.is_match(title) {
            weight = weight.max(TITLE_WEIGHT);
        }
        if re.is_match(summary) {
            weight = weight.max(SUMMARY_WEIGHT);
        }
        if re.is_match(content) {
            weight = weight.max(CONTENT_WEIGHT);
        }
        weight
    }

    /// 词条的词边界匹配模式，命中缓存则复用编译结果
    fn pattern(&self, term: &str) -> Regex {
        if let Some(re) = self.patterns.read().unwrap().get(term) {
            return re.clone();
        }
        // regex::escape保证转义后的词条是合法模式
        let re = Regex::new(&format!(r"\b{}\b", regex::escape(term)))
            .expect("escaped keyword term compiles");
        self.patterns
            .write()
            .unwrap()
            .insert(term.to_string(), re.clone());
        re
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scorer for KeywordScorer {
    async fn score(
        &self,
        title: &str,
        summary: &str,
        content: &str,
        keywords: &[Keyword],
    ) -> f64 {
        if keywords.is_empty() {
            return 0.0;
        }

        let title = title.to_lowercase();
        let summary = summary.to_lowercase();
        let content = content.to_lowercase();

        let total: f64 = keywords
            .iter()
            .map(|k| {
                let term = k.term.trim().to_lowercase();
                self.keyword_weight(&term, &title, &summary, &content)
            })
            .sum();

        (total / keywords.len() as f64).clamp(0.0, 1.0)
    }
}
