// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::repositories::RepositoryError;

/// 爬取运行错误类型
///
/// 运行级错误，只会导致该次运行被标记为FAILED，
/// 不会影响调度器外层循环
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Crawler {0} not found")]
    CrawlerNotFound(Uuid),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// 调度器错误类型
///
/// Tick级错误，记录日志后提前结束本轮，下一Tick重试
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Lease error: {0}")]
    Lease(String),
}

/// 截断错误信息
///
/// 持久化到运行记录前将错误信息限制在最大长度内
pub fn truncate_error(message: &str, max_len: usize) -> String {
    if message.len() <= max_len {
        return message.to_string();
    }
    let mut end = max_len;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    message[..end].to_string()
}
