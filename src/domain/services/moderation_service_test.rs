#[cfg(test)]
mod tests {
    use crate::domain::models::moderation_item::{ModerationItem, ModerationStatus};
    use crate::domain::models::post::Post;
    use crate::domain::repositories::moderation_repository::ModerationRepository;
    use crate::domain::repositories::post_repository::PostRepository;
    use crate::domain::repositories::RepositoryError;
    use crate::domain::services::moderation_service::{ModerationError, ModerationService};
    use async_trait::async_trait;
    use chrono::{DateTime, FixedOffset, Utc};
    use mockall::mock;
    use mockall::predicate::*;
    use std::sync::Arc;
    use uuid::Uuid;

    // --- Mocks ---

    mock! {
        pub ModerationRepo {}
        #[async_trait]
        impl ModerationRepository for ModerationRepo {
            async fn exists(&self, crawler_id: Uuid, url_hash: &str) -> Result<bool, RepositoryError>;
            async fn insert_pending(&self, item: &ModerationItem) -> Result<bool, RepositoryError>;
            async fn find_by_ids(&self, crawler_id: Uuid, ids: &[Uuid]) -> Result<Vec<ModerationItem>, RepositoryError>;
            async fn find_by_id(&self, id: Uuid) -> Result<Option<ModerationItem>, RepositoryError>;
            async fn update_status(&self, id: Uuid, status: ModerationStatus, decided_by: &str, decided_at: DateTime<FixedOffset>) -> Result<(), RepositoryError>;
            async fn list_by_status(&self, crawler_id: Uuid, status: ModerationStatus, limit: u64) -> Result<Vec<ModerationItem>, RepositoryError>;
        }
    }

    mock! {
        pub PostRepo {}
        #[async_trait]
        impl PostRepository for PostRepo {
            async fn upsert(&self, post: &Post) -> Result<(), RepositoryError>;
            async fn find_by_url_hash(&self, url_hash: &str) -> Result<Option<Post>, RepositoryError>;
        }
    }

    fn pending_item(crawler_id: Uuid) -> ModerationItem {
        ModerationItem {
            id: Uuid::new_v4(),
            crawler_id,
            url: "https://example.com/article".to_string(),
            url_hash: "abc123".to_string(),
            title: Some("Article".to_string()),
            summary: None,
            content: None,
            image_url: None,
            author: None,
            source_name: None,
            language: None,
            score: 0.9,
            status: ModerationStatus::Pending,
            discovered_at: Utc::now().fixed_offset(),
            decided_at: None,
            decided_by: None,
        }
    }

    #[tokio::test]
    async fn test_bulk_action_invalid_action_mutates_nothing() {
        let mut items = MockModerationRepo::new();
        let mut posts = MockPostRepo::new();
        // 校验失败时不应触碰任何仓库
        items.expect_find_by_ids().never();
        items.expect_update_status().never();
        posts.expect_upsert().never();

        let service = ModerationService::new(Arc::new(items), Arc::new(posts));
        let result = service
            .bulk_action(Uuid::new_v4(), &[Uuid::new_v4()], "DELETE")
            .await;

        assert!(matches!(result, Err(ModerationError::Validation(_))));
    }

    #[tokio::test]
    async fn test_bulk_action_empty_ids_is_validation_error() {
        let items = MockModerationRepo::new();
        let posts = MockPostRepo::new();
        let service = ModerationService::new(Arc::new(items), Arc::new(posts));

        let result = service.bulk_action(Uuid::new_v4(), &[], "APPROVE").await;
        assert!(matches!(result, Err(ModerationError::Validation(_))));
    }

    #[tokio::test]
    async fn test_bulk_action_no_matches_is_not_found() {
        let mut items = MockModerationRepo::new();
        items
            .expect_find_by_ids()
            .returning(|_, _| Ok(Vec::new()));
        let posts = MockPostRepo::new();
        let service = ModerationService::new(Arc::new(items), Arc::new(posts));

        let result = service
            .bulk_action(Uuid::new_v4(), &[Uuid::new_v4()], "REJECT")
            .await;
        assert!(matches!(result, Err(ModerationError::NotFound)));
    }

    #[tokio::test]
    async fn test_bulk_approve_promotes_each_item() {
        let crawler_id = Uuid::new_v4();
        let item_a = pending_item(crawler_id);
        let item_b = pending_item(crawler_id);
        let ids = vec![item_a.id, item_b.id];

        let mut items = MockModerationRepo::new();
        let found = vec![item_a.clone(), item_b.clone()];
        items
            .expect_find_by_ids()
            .with(eq(crawler_id), always())
            .return_once(move |_, _| Ok(found));
        items
            .expect_update_status()
            .times(2)
            .returning(|_, _, _, _| Ok(()));

        let mut posts = MockPostRepo::new();
        posts.expect_upsert().times(2).returning(|_| Ok(()));

        let service = ModerationService::new(Arc::new(items), Arc::new(posts));
        let outcome = service
            .bulk_action(crawler_id, &ids, "APPROVE")
            .await
            .unwrap();

        assert_eq!(outcome.count, 2);
    }

    #[tokio::test]
    async fn test_bulk_reject_does_not_promote() {
        let crawler_id = Uuid::new_v4();
        let item = pending_item(crawler_id);
        let ids = vec![item.id];

        let mut items = MockModerationRepo::new();
        let found = vec![item];
        items
            .expect_find_by_ids()
            .return_once(move |_, _| Ok(found));
        items
            .expect_update_status()
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let mut posts = MockPostRepo::new();
        posts.expect_upsert().never();

        let service = ModerationService::new(Arc::new(items), Arc::new(posts));
        let outcome = service.bulk_action(crawler_id, &ids, "REJECT").await.unwrap();
        assert_eq!(outcome.count, 1);
    }

    #[tokio::test]
    async fn test_bulk_action_reports_partial_count() {
        let crawler_id = Uuid::new_v4();
        let item_a = pending_item(crawler_id);
        let item_b = pending_item(crawler_id);
        let failing_id = item_b.id;
        let ids = vec![item_a.id, item_b.id];

        let mut items = MockModerationRepo::new();
        let found = vec![item_a, item_b];
        items
            .expect_find_by_ids()
            .return_once(move |_, _| Ok(found));
        items
            .expect_update_status()
            .returning(move |id, _, _, _| {
                if id == failing_id {
                    Err(RepositoryError::NotFound)
                } else {
                    Ok(())
                }
            });

        let posts = MockPostRepo::new();
        let service = ModerationService::new(Arc::new(items), Arc::new(posts));
        let outcome = service
            .bulk_action(crawler_id, &ids, "ARCHIVE")
            .await
            .unwrap();

        // 部分失败通过计数暴露而不是被吞掉
        assert_eq!(outcome.count, 1);
    }

    #[tokio::test]
    async fn test_update_status_rejects_pending_target() {
        let items = MockModerationRepo::new();
        let posts = MockPostRepo::new();
        let service = ModerationService::new(Arc::new(items), Arc::new(posts));

        let result = service
            .update_status(Uuid::new_v4(), ModerationStatus::Pending, "moderator")
            .await;
        assert!(matches!(result, Err(ModerationError::Validation(_))));
    }

    #[tokio::test]
    async fn test_queue_post_reports_duplicate_as_noop() {
        let crawler_id = Uuid::new_v4();
        let item = pending_item(crawler_id);

        let mut items = MockModerationRepo::new();
        items.expect_insert_pending().returning(|_| Ok(false));
        let posts = MockPostRepo::new();

        let service = ModerationService::new(Arc::new(items), Arc::new(posts));
        let inserted = service.queue_post(&item).await.unwrap();
        assert!(!inserted);
    }
}
