// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 爬取运行实体
///
/// 表示某个爬虫对其全部信息源的一次执行。由调度器创建，
/// 之后只由持有它的运行引擎修改；进入COMPLETED/FAILED后不再变化。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlRun {
    /// 运行唯一标识符
    pub id: Uuid,
    /// 所属爬虫ID
    pub crawler_id: Uuid,
    /// 运行状态
    pub status: CrawlRunStatus,
    /// 开始执行时间
    pub started_at: Option<DateTime<FixedOffset>>,
    /// 完成时间
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// 尝试处理的条目总数
    pub items_found: i32,
    /// 实际入队的条目数
    pub items_processed: i32,
    /// 失败时的错误信息（截断至1000字符）
    pub error: Option<String>,
}

impl CrawlRun {
    /// 创建处于PENDING状态的新运行
    pub fn new(crawler_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            crawler_id,
            status: CrawlRunStatus::Pending,
            started_at: None,
            completed_at: None,
            items_found: 0,
            items_processed: 0,
            error: None,
        }
    }

    /// 标记运行进入RUNNING状态
    pub fn start(&mut self) {
        self.status = CrawlRunStatus::Running;
        self.started_at = Some(Utc::now().fixed_offset());
    }

    /// 判断运行是否已终止
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            CrawlRunStatus::Completed | CrawlRunStatus::Failed
        )
    }
}

/// 爬取运行状态枚举
///
/// 状态转换遵循以下流程：
/// Pending → Running → Completed/Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrawlRunStatus {
    /// 已创建但尚未开始执行
    #[default]
    Pending,
    /// 正在执行，任一时刻每个爬虫至多有一个
    Running,
    /// 成功执行完成
    Completed,
    /// 执行失败
    Failed,
}

impl fmt::Display for CrawlRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CrawlRunStatus::Pending => write!(f, "pending"),
            CrawlRunStatus::Running => write!(f, "running"),
            CrawlRunStatus::Completed => write!(f, "completed"),
            CrawlRunStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for CrawlRunStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CrawlRunStatus::Pending),
            "running" => Ok(CrawlRunStatus::Running),
            "completed" => Ok(CrawlRunStatus::Completed),
            "failed" => Ok(CrawlRunStatus::Failed),
            _ => Err(()),
        }
    }
}
