// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::moderation_item::ModerationStatus;
use crate::domain::repositories::{
    moderation_repository::ModerationRepository, post_repository::PostRepository,
};
use crate::domain::services::moderation_service::{ModerationError, ModerationService};
use crate::presentation::errors::AppError;

/// 待审列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 返回条数上限，默认50
    pub limit: Option<u64>,
}

/// 批量审核请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BulkActionDto {
    /// 待处理的条目ID列表
    #[validate(length(min = 1, message = "item_ids cannot be empty"))]
    pub item_ids: Vec<Uuid>,
    /// 动作：APPROVE、REJECT或ARCHIVE
    #[validate(length(min = 1, message = "action is required"))]
    pub action: String,
}

/// 单条审核决策请求
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct DecisionDto {
    /// 目标状态：approved、rejected或archived
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
    /// 决策人标识
    #[validate(length(min = 1, message = "decided_by is required"))]
    pub decided_by: String,
}

/// 列出爬虫的待审条目
pub async fn list_pending<M, P>(
    Extension(service): Extension<Arc<ModerationService<M, P>>>,
    Path(crawler_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError>
where
    M: ModerationRepository + 'static,
    P: PostRepository + 'static,
{
    let limit = query.limit.unwrap_or(50).min(200);
    let items = service.list_pending(crawler_id, limit).await?;

    Ok((StatusCode::OK, Json(json!({ "items": items }))))
}

/// 批量审核动作
///
/// 动作无效或ID列表为空时整体拒绝，不改动任何记录
pub async fn bulk_action<M, P>(
    Extension(service): Extension<Arc<ModerationService<M, P>>>,
    Path(crawler_id): Path<Uuid>,
    Json(payload): Json<BulkActionDto>,
) -> Result<impl IntoResponse, AppError>
where
    M: ModerationRepository + 'static,
    P: PostRepository + 'static,
{
    payload
        .validate()
        .map_err(|e| ModerationError::Validation(e.to_string()))?;

    let outcome = service
        .bulk_action(crawler_id, &payload.item_ids, &payload.action)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "action": outcome.action.to_string(),
            "count": outcome.count,
        })),
    ))
}

/// 单条审核决策
pub async fn decide<M, P>(
    Extension(service): Extension<Arc<ModerationService<M, P>>>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<DecisionDto>,
) -> Result<impl IntoResponse, AppError>
where
    M: ModerationRepository + 'static,
    P: PostRepository + 'static,
{
    payload
        .validate()
        .map_err(|e| ModerationError::Validation(e.to_string()))?;

    let status: ModerationStatus = payload
        .status
        .parse()
        .map_err(|_| ModerationError::Validation(format!("invalid status: {}", payload.status)))?;

    service
        .update_status(item_id, status, &payload.decided_by)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "status": status.to_string(),
        })),
    ))
}
