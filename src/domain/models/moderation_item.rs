// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 审核条目实体
///
/// 通过去重和评分准入后等待人工决策的候选内容。
/// 只由采集流水线以PENDING状态创建，之后只由审核决策修改，
/// 决策后不会回到PENDING。`(crawler_id, url_hash)` 在爬虫范围内唯一。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationItem {
    /// 条目唯一标识符
    pub id: Uuid,
    /// 所属爬虫ID，去重范围以此为界
    pub crawler_id: Uuid,
    /// 原始URL（规范化后）
    pub url: String,
    /// 规范化URL的SHA-256哈希
    pub url_hash: String,
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
    /// 来源名称
    pub source_name: Option<String>,
    /// 语言
    pub language: Option<String>,
    /// 相关性得分（0-1）
    pub score: f64,
    /// 审核状态
    pub status: ModerationStatus,
    /// 发现时间
    pub discovered_at: DateTime<FixedOffset>,
    /// 决策时间
    pub decided_at: Option<DateTime<FixedOffset>>,
    /// 决策人
    pub decided_by: Option<String>,
}

/// 审核状态枚举
///
/// PENDING是唯一的入口状态；其余状态均为终态，
/// 不存在回到PENDING的转换。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    /// 等待人工决策
    #[default]
    Pending,
    /// 已通过，同时幂等晋升为Post
    Approved,
    /// 已拒绝（人工审阅后否决，区别于未达阈值的静默丢弃）
    Rejected,
    /// 已归档
    Archived,
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModerationStatus::Pending => write!(f, "pending"),
            ModerationStatus::Approved => write!(f, "approved"),
            ModerationStatus::Rejected => write!(f, "rejected"),
            ModerationStatus::Archived => write!(f, "archived"),
        }
    }
}

impl FromStr for ModerationStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ModerationStatus::Pending),
            "approved" => Ok(ModerationStatus::Approved),
            "rejected" => Ok(ModerationStatus::Rejected),
            "archived" => Ok(ModerationStatus::Archived),
            _ => Err(()),
        }
    }
}

/// 批量审核动作枚举
///
/// 外部审核接口接受的动作集合，不包含回到PENDING的路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationAction {
    /// 通过并晋升
    Approve,
    /// 拒绝
    Reject,
    /// 归档
    Archive,
}

impl ModerationAction {
    /// 动作对应的目标状态
    pub fn target_status(&self) -> ModerationStatus {
        match self {
            ModerationAction::Approve => ModerationStatus::Approved,
            ModerationAction::Reject => ModerationStatus::Rejected,
            ModerationAction::Archive => ModerationStatus::Archived,
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModerationAction::Approve => write!(f, "APPROVE"),
            ModerationAction::Reject => write!(f, "REJECT"),
            ModerationAction::Archive => write!(f, "ARCHIVE"),
        }
    }
}

impl FromStr for ModerationAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROVE" => Ok(ModerationAction::Approve),
            "REJECT" => Ok(ModerationAction::Reject),
            "ARCHIVE" => Ok(ModerationAction::Archive),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_target_status() {
        assert_eq!(
            ModerationAction::Approve.target_status(),
            ModerationStatus::Approved
        );
        assert_eq!(
            ModerationAction::Reject.target_status(),
            ModerationStatus::Rejected
        );
        assert_eq!(
            ModerationAction::Archive.target_status(),
            ModerationStatus::Archived
        );
    }

    #[test]
    fn test_action_parse_is_strict() {
        assert_eq!(
            "APPROVE".parse::<ModerationAction>().unwrap(),
            ModerationAction::Approve
        );
        // 无效动作与回到PENDING的动作都不存在
        assert!("approve".parse::<ModerationAction>().is_err());
        assert!("PENDING".parse::<ModerationAction>().is_err());
        assert!("DELETE".parse::<ModerationAction>().is_err());
    }
}
