// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;

/// 爬虫配置仓库接口
pub mod crawler_repository;
/// 爬取运行仓库接口
pub mod crawl_run_repository;
/// 租约仓库接口
pub mod lease_repository;
/// 审核队列仓库接口
pub mod moderation_repository;
/// 发布内容仓库接口
pub mod post_repository;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}
