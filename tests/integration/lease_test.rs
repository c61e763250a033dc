// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Duration;
use curatrs::domain::repositories::lease_repository::LeaseRepository;
use curatrs::infrastructure::repositories::lease_repo_impl::LeaseRepositoryImpl;
use uuid::Uuid;

use super::helpers::setup_db;

#[tokio::test]
async fn second_holder_is_blocked_while_lease_is_live() {
    let db = setup_db().await;
    let leases = LeaseRepositoryImpl::new(db);
    let crawler_id = Uuid::new_v4();
    let holder_a = Uuid::new_v4();
    let holder_b = Uuid::new_v4();

    let acquired = leases
        .acquire(crawler_id, holder_a, Duration::minutes(15))
        .await
        .unwrap();
    assert!(acquired);

    let acquired = leases
        .acquire(crawler_id, holder_b, Duration::minutes(15))
        .await
        .unwrap();
    assert!(!acquired);
}

#[tokio::test]
async fn holder_can_renew_its_own_lease() {
    let db = setup_db().await;
    let leases = LeaseRepositoryImpl::new(db);
    let crawler_id = Uuid::new_v4();
    let holder = Uuid::new_v4();

    assert!(leases
        .acquire(crawler_id, holder, Duration::minutes(15))
        .await
        .unwrap());
    assert!(leases
        .acquire(crawler_id, holder, Duration::minutes(15))
        .await
        .unwrap());
}

#[tokio::test]
async fn expired_lease_is_taken_over() {
    let db = setup_db().await;
    let leases = LeaseRepositoryImpl::new(db);
    let crawler_id = Uuid::new_v4();
    let crashed_holder = Uuid::new_v4();
    let new_holder = Uuid::new_v4();

    // TTL为负数模拟持有者崩溃后租约已过期
    assert!(leases
        .acquire(crawler_id, crashed_holder, Duration::seconds(-1))
        .await
        .unwrap());

    let acquired = leases
        .acquire(crawler_id, new_holder, Duration::minutes(15))
        .await
        .unwrap();
    assert!(acquired);
}

#[tokio::test]
async fn release_frees_the_lease() {
    let db = setup_db().await;
    let leases = LeaseRepositoryImpl::new(db);
    let crawler_id = Uuid::new_v4();
    let holder_a = Uuid::new_v4();
    let holder_b = Uuid::new_v4();

    assert!(leases
        .acquire(crawler_id, holder_a, Duration::minutes(15))
        .await
        .unwrap());
    leases.release(crawler_id, holder_a).await.unwrap();

    assert!(leases
        .acquire(crawler_id, holder_b, Duration::minutes(15))
        .await
        .unwrap());
}

#[tokio::test]
async fn release_does_not_touch_foreign_lease() {
    let db = setup_db().await;
    let leases = LeaseRepositoryImpl::new(db);
    let crawler_id = Uuid::new_v4();
    let holder_a = Uuid::new_v4();
    let holder_b = Uuid::new_v4();

    assert!(leases
        .acquire(crawler_id, holder_a, Duration::minutes(15))
        .await
        .unwrap());

    // 非持有者的释放是空操作
    leases.release(crawler_id, holder_b).await.unwrap();

    let acquired = leases
        .acquire(crawler_id, holder_b, Duration::minutes(15))
        .await
        .unwrap();
    assert!(!acquired);
}

#[tokio::test]
async fn leases_on_different_crawlers_are_independent() {
    let db = setup_db().await;
    let leases = LeaseRepositoryImpl::new(db);
    let holder = Uuid::new_v4();

    assert!(leases
        .acquire(Uuid::new_v4(), holder, Duration::minutes(15))
        .await
        .unwrap());
    assert!(leases
        .acquire(Uuid::new_v4(), holder, Duration::minutes(15))
        .await
        .unwrap());
}
