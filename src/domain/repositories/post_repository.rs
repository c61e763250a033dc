// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::post::Post;
use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;

/// 发布内容仓库特质
///
/// 发布目录的读取方在核心之外，核心只负责幂等写入
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// 以url_hash为键Upsert发布内容
    ///
    /// 不存在则创建，已存在则原地更新，重复晋升幂等
    async fn upsert(&self, post: &Post) -> Result<(), RepositoryError>;

    /// 根据url_hash查找发布内容
    async fn find_by_url_hash(&self, url_hash: &str) -> Result<Option<Post>, RepositoryError>;
}
