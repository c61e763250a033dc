// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use curatrs::domain::models::moderation_item::ModerationStatus;
use curatrs::domain::repositories::moderation_repository::ModerationRepository;
use curatrs::domain::repositories::post_repository::PostRepository;
use curatrs::domain::services::moderation_service::{ModerationError, ModerationService};
use curatrs::infrastructure::database::entities::post as post_entity;
use curatrs::infrastructure::repositories::moderation_repo_impl::ModerationRepositoryImpl;
use curatrs::infrastructure::repositories::post_repo_impl::PostRepositoryImpl;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use std::sync::Arc;
use uuid::Uuid;

use super::helpers::{pending_item, seed_crawler, setup_db};

fn build_service(
    db: Arc<DatabaseConnection>,
) -> (
    ModerationService<ModerationRepositoryImpl, PostRepositoryImpl>,
    Arc<ModerationRepositoryImpl>,
    Arc<PostRepositoryImpl>,
) {
    let items = Arc::new(ModerationRepositoryImpl::new(db.clone()));
    let posts = Arc::new(PostRepositoryImpl::new(db));
    let service = ModerationService::new(items.clone(), posts.clone());
    (service, items, posts)
}

async fn count_posts(db: &DatabaseConnection) -> u64 {
    post_entity::Entity::find().count(db).await.unwrap()
}

#[tokio::test]
async fn duplicate_enqueue_is_a_silent_noop() {
    let db = setup_db().await;
    let crawler_id = seed_crawler(&db).await;
    let items = ModerationRepositoryImpl::new(db);
    let item = pending_item(crawler_id, "https://example.com/a", "First");

    assert!(items.insert_pending(&item).await.unwrap());

    // 同一(crawler, url_hash)再次入队：不报错也不写入
    let mut duplicate = pending_item(crawler_id, "https://example.com/a", "Second");
    duplicate.id = Uuid::new_v4();
    assert!(!items.insert_pending(&duplicate).await.unwrap());

    let found = items
        .list_by_status(crawler_id, ModerationStatus::Pending, 10)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title.as_deref(), Some("First"));
}

#[tokio::test]
async fn same_url_is_allowed_for_different_crawlers() {
    let db = setup_db().await;
    let first_crawler = seed_crawler(&db).await;
    let second_crawler = seed_crawler(&db).await;
    let items = ModerationRepositoryImpl::new(db);

    let first = pending_item(first_crawler, "https://example.com/a", "First");
    let second = pending_item(second_crawler, "https://example.com/a", "Second");

    assert!(items.insert_pending(&first).await.unwrap());
    assert!(items.insert_pending(&second).await.unwrap());
}

#[tokio::test]
async fn double_approve_yields_exactly_one_post() {
    let db = setup_db().await;
    let crawler_id = seed_crawler(&db).await;
    let (service, _items, posts) = build_service(db.clone());
    let item = pending_item(crawler_id, "https://example.com/article?utm_source=x", "Article");

    assert!(service.queue_post(&item).await.unwrap());

    service
        .update_status(item.id, ModerationStatus::Approved, "editor")
        .await
        .unwrap();
    service
        .update_status(item.id, ModerationStatus::Approved, "editor")
        .await
        .unwrap();

    assert_eq!(count_posts(&db).await, 1);

    let post = posts.find_by_url_hash(&item.url_hash).await.unwrap();
    let post = post.expect("approved item must be promoted");
    // 晋升时持久化的是规范化URL，跟踪参数已剥离
    assert_eq!(post.url, "https://example.com/article");
}

#[tokio::test]
async fn reject_and_archive_do_not_promote() {
    let db = setup_db().await;
    let crawler_id = seed_crawler(&db).await;
    let (service, items, _posts) = build_service(db.clone());

    let rejected = pending_item(crawler_id, "https://example.com/r", "Rejected");
    let archived = pending_item(crawler_id, "https://example.com/z", "Archived");
    service.queue_post(&rejected).await.unwrap();
    service.queue_post(&archived).await.unwrap();

    service
        .update_status(rejected.id, ModerationStatus::Rejected, "editor")
        .await
        .unwrap();
    service
        .update_status(archived.id, ModerationStatus::Archived, "editor")
        .await
        .unwrap();

    assert_eq!(count_posts(&db).await, 0);

    let stored = items.find_by_id(rejected.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ModerationStatus::Rejected);
    assert_eq!(stored.decided_by.as_deref(), Some("editor"));
    assert!(stored.decided_at.is_some());
}

#[tokio::test]
async fn pending_is_not_a_decision_target() {
    let db = setup_db().await;
    let crawler_id = seed_crawler(&db).await;
    let (service, items, _posts) = build_service(db);
    let item = pending_item(crawler_id, "https://example.com/p", "Pending");
    service.queue_post(&item).await.unwrap();

    let err = service
        .update_status(item.id, ModerationStatus::Pending, "editor")
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::Validation(_)));

    let stored = items.find_by_id(item.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ModerationStatus::Pending);
}

#[tokio::test]
async fn bulk_approve_promotes_every_item_in_scope() {
    let db = setup_db().await;
    let crawler_id = seed_crawler(&db).await;
    let (service, items, _posts) = build_service(db.clone());

    let first = pending_item(crawler_id, "https://example.com/1", "One");
    let second = pending_item(crawler_id, "https://example.com/2", "Two");
    service.queue_post(&first).await.unwrap();
    service.queue_post(&second).await.unwrap();

    let outcome = service
        .bulk_action(crawler_id, &[first.id, second.id], "APPROVE")
        .await
        .unwrap();
    assert_eq!(outcome.count, 2);
    assert_eq!(count_posts(&db).await, 2);

    for id in [first.id, second.id] {
        let stored = items.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.status, ModerationStatus::Approved);
    }
}

#[tokio::test]
async fn bulk_action_ignores_items_of_other_crawlers() {
    let db = setup_db().await;
    let crawler_id = seed_crawler(&db).await;
    let other_crawler = seed_crawler(&db).await;
    let (service, items, _posts) = build_service(db);

    let mine = pending_item(crawler_id, "https://example.com/mine", "Mine");
    let foreign = pending_item(other_crawler, "https://example.com/foreign", "Foreign");
    service.queue_post(&mine).await.unwrap();
    service.queue_post(&foreign).await.unwrap();

    let outcome = service
        .bulk_action(crawler_id, &[mine.id, foreign.id], "REJECT")
        .await
        .unwrap();
    assert_eq!(outcome.count, 1);

    let stored = items.find_by_id(foreign.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ModerationStatus::Pending);
}

#[tokio::test]
async fn invalid_bulk_action_leaves_the_queue_untouched() {
    let db = setup_db().await;
    let crawler_id = seed_crawler(&db).await;
    let (service, items, _posts) = build_service(db);
    let item = pending_item(crawler_id, "https://example.com/x", "X");
    service.queue_post(&item).await.unwrap();

    let err = service
        .bulk_action(crawler_id, &[item.id], "PUBLISH")
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::Validation(_)));

    let stored = items.find_by_id(item.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ModerationStatus::Pending);
}

#[tokio::test]
async fn bulk_action_with_no_matching_items_is_not_found() {
    let db = setup_db().await;
    let (service, _items, _posts) = build_service(db);

    let err = service
        .bulk_action(Uuid::new_v4(), &[Uuid::new_v4()], "APPROVE")
        .await
        .unwrap_err();
    assert!(matches!(err, ModerationError::NotFound));
}
