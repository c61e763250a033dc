// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::moderation_item::{ModerationAction, ModerationItem, ModerationStatus};
use crate::domain::models::post::Post;
use crate::domain::repositories::moderation_repository::ModerationRepository;
use crate::domain::repositories::post_repository::PostRepository;
use crate::domain::repositories::RepositoryError;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// 审核服务错误类型
#[derive(Error, Debug)]
pub enum ModerationError {
    /// 请求校验失败（无效动作、空ID列表等）
    #[error("Validation error: {0}")]
    Validation(String),

    /// 范围内没有匹配的条目
    #[error("No matching moderation items")]
    NotFound,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 批量审核结果
#[derive(Debug, Clone)]
pub struct BulkActionOutcome {
    /// 执行的动作
    pub action: ModerationAction,
    /// 实际处理的条目数，与请求条数的差值暴露部分失败
    pub count: u64,
}

/// 审核队列服务
///
/// 持有候选条目并暴露决策操作；APPROVE时以url_hash为键
/// 幂等晋升为Post。状态机单向：PENDING为唯一入口，
/// 决策后不存在回到PENDING的路径。
pub struct ModerationService<M, P>
where
    M: ModerationRepository,
    P: PostRepository,
{
    items: Arc<M>,
    posts: Arc<P>,
}

impl<M, P> ModerationService<M, P>
where
    M: ModerationRepository,
    P: PostRepository,
{
    /// 创建新的审核服务实例
    pub fn new(items: Arc<M>, posts: Arc<P>) -> Self {
        Self { items, posts }
    }

    /// 去重查找：判断 `(crawler_id, url_hash)` 是否已入队
    pub async fn exists(&self, crawler_id: Uuid, url_hash: &str) -> Result<bool, ModerationError> {
        Ok(self.items.exists(crawler_id, url_hash).await?)
    }

    /// 将候选条目入队为PENDING
    ///
    /// 调用方应已完成去重，这里的存在性检查是防御性的：
    /// `(crawler_id, url_hash)` 已存在时为幂等空操作
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 实际入队
    /// * `Ok(false)` - 已存在，跳过
    pub async fn queue_post(&self, item: &ModerationItem) -> Result<bool, ModerationError> {
        let inserted = self.items.insert_pending(item).await?;
        if !inserted {
            info!(
                crawler_id = %item.crawler_id,
                url_hash = %item.url_hash,
                "Moderation item already queued, skipping"
            );
        }
        Ok(inserted)
    }

    /// 列出爬虫的待审条目
    pub async fn list_pending(
        &self,
        crawler_id: Uuid,
        limit: u64,
    ) -> Result<Vec<ModerationItem>, ModerationError> {
        Ok(self
            .items
            .list_by_status(crawler_id, ModerationStatus::Pending, limit)
            .await?)
    }

    /// 单条决策
    ///
    /// 写入决策时间与决策人；PENDING不是合法目标状态。
    /// 目标为APPROVED时同步晋升Post。
    pub async fn update_status(
        &self,
        id: Uuid,
        status: ModerationStatus,
        decided_by: &str,
    ) -> Result<(), ModerationError> {
        if status == ModerationStatus::Pending {
            return Err(ModerationError::Validation(
                "pending is not a valid decision target".to_string(),
            ));
        }

        let item = self
            .items
            .find_by_id(id)
            .await?
            .ok_or(ModerationError::NotFound)?;

        let decided_at = Utc::now().fixed_offset();
        self.items
            .update_status(id, status, decided_by, decided_at)
            .await?;

        if status == ModerationStatus::Approved {
            self.posts.upsert(&Post::from(&item)).await?;
        }

        info!(item_id = %id, status = %status, decided_by, "Moderation decision applied");
        Ok(())
    }

    /// 批量审核动作
    ///
    /// 动作字符串无效或ID列表为空时返回校验错误且不改动任何记录；
    /// 爬虫范围内无匹配条目时返回未找到。返回实际处理的条目数。
    pub async fn bulk_action(
        &self,
        crawler_id: Uuid,
        item_ids: &[Uuid],
        action: &str,
    ) -> Result<BulkActionOutcome, ModerationError> {
        let action: ModerationAction = action
            .parse()
            .map_err(|_| ModerationError::Validation(format!("invalid action: {}", action)))?;

        if item_ids.is_empty() {
            return Err(ModerationError::Validation(
                "item_ids cannot be empty".to_string(),
            ));
        }

        let items = self.items.find_by_ids(crawler_id, item_ids).await?;
        if items.is_empty() {
            return Err(ModerationError::NotFound);
        }

        let target = action.target_status();
        let decided_at = Utc::now().fixed_offset();
        let mut count = 0u64;

        for item in &items {
            if let Err(e) = self
                .items
                .update_status(item.id, target, "moderator", decided_at)
                .await
            {
                warn!(item_id = %item.id, error = %e, "Failed to apply bulk decision, continuing");
                continue;
            }

            if action == ModerationAction::Approve {
                if let Err(e) = self.posts.upsert(&Post::from(item)).await {
                    warn!(item_id = %item.id, error = %e, "Failed to promote approved item");
                    continue;
                }
            }

            count += 1;
        }

        info!(
            %crawler_id,
            action = %action,
            requested = item_ids.len(),
            processed = count,
            "Bulk moderation action applied"
        );

        Ok(BulkActionOutcome { action, count })
    }
}
