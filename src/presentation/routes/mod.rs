// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::repositories::moderation_repo_impl::ModerationRepositoryImpl;
use crate::infrastructure::repositories::post_repo_impl::PostRepositoryImpl;
use crate::presentation::handlers::moderation_handler;
use axum::{
    routing::{get, post, put},
    Router,
};

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let moderation_routes = Router::new()
        .route(
            "/v1/crawlers/{id}/moderation",
            get(moderation_handler::list_pending::<ModerationRepositoryImpl, PostRepositoryImpl>),
        )
        .route(
            "/v1/crawlers/{id}/moderation/bulk",
            post(moderation_handler::bulk_action::<ModerationRepositoryImpl, PostRepositoryImpl>),
        )
        .route(
            "/v1/moderation/{id}",
            put(moderation_handler::decide::<ModerationRepositoryImpl, PostRepositoryImpl>),
        );

    Router::new().merge(public_routes).merge(moderation_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
