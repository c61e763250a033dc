// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::moderation_item::{ModerationItem, ModerationStatus};
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// 审核队列仓库特质
#[async_trait]
pub trait ModerationRepository: Send + Sync {
    /// 判断 `(crawler_id, url_hash)` 是否已存在
    ///
    /// 去重范围为单个爬虫，同一URL可被不同爬虫各自入队
    async fn exists(&self, crawler_id: Uuid, url_hash: &str) -> Result<bool, RepositoryError>;

    /// 插入PENDING条目
    ///
    /// 若 `(crawler_id, url_hash)` 已存在则为幂等空操作
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 实际发生了插入
    /// * `Ok(false)` - 条目已存在，未插入
    async fn insert_pending(&self, item: &ModerationItem) -> Result<bool, RepositoryError>;

    /// 在爬虫范围内按ID批量加载条目
    async fn find_by_ids(
        &self,
        crawler_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<ModerationItem>, RepositoryError>;

    /// 根据ID查找条目
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ModerationItem>, RepositoryError>;

    /// 单条状态转换，同时写入决策时间与决策人
    async fn update_status(
        &self,
        id: Uuid,
        status: ModerationStatus,
        decided_by: &str,
        decided_at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError>;

    /// 列出爬虫的待审条目，按发现时间排列
    async fn list_by_status(
        &self,
        crawler_id: Uuid,
        status: ModerationStatus,
        limit: u64,
    ) -> Result<Vec<ModerationItem>, RepositoryError>;
}
