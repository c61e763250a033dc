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

use crate::domain::models::post::Post;
use crate::domain::repositories::post_repository::PostRepository;
use crate::domain::repositories::RepositoryError;
use crate::infrastructure::database::entities::post as post_entity;
use async_trait::async_trait;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;

/// 已发布内容仓库实现
///
/// 以 `url_hash` 为去重键做upsert，重复提升只刷新内容
#[derive(Clone)]
pub struct PostRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl PostRepositoryImpl {
    /// 创建新的已发布内容仓库实例
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<post_entity::Model> for Post {
    fn from(model: post_entity::Model) -> Self {
        Self {
            id: model.id,
            url_hash: model.url_hash,
            url: model.url,
            title: model.title,
            summary: model.summary,
            content: model.content,
            image_url: model.image_url,
            author: model.author,
            source_name: model.source_name,
            language: model.language,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl PostRepository for PostRepositoryImpl {
    async fn upsert(&self, post: &Post) -> Result<(), RepositoryError> {
        let model = post_entity::ActiveModel {
            id: Set(post.id),
            url_hash: Set(post.url_hash.clone()),
            url: Set(post.url.clone()),
            title: Set(post.title.clone()),
            summary: Set(post.summary.clone()),
            content: Set(post.content.clone()),
            image_url: Set(post.image_url.clone()),
            author: Set(post.author.clone()),
            source_name: Set(post.source_name.clone()),
            language: Set(post.language.clone()),
            created_at: Set(post.created_at),
            updated_at: Set(post.updated_at),
        };

        post_entity::Entity::insert(model)
            .on_conflict(
                OnConflict::column(post_entity::Column::UrlHash)
                    .update_columns([
                        post_entity::Column::Url,
                        post_entity::Column::Title,
                        post_entity::Column::Summary,
                        post_entity::Column::Content,
                        post_entity::Column::ImageUrl,
                        post_entity::Column::Author,
                        post_entity::Column::SourceName,
                        post_entity::Column::Language,
                        post_entity::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn find_by_url_hash(&self, url_hash: &str) -> Result<Option<Post>, RepositoryError> {
        let model = post_entity::Entity::find()
            .filter(post_entity::Column::UrlHash.eq(url_hash))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }
}
