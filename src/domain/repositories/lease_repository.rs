// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::RepositoryError;
use async_trait::async_trait;
use chrono::Duration;
use uuid::Uuid;

/// 租约仓库特质
///
/// 以爬虫ID为键的跨进程互斥原语。租约带TTL而非无条件锁：
/// 持有者崩溃后租约到期即可被其他副本原子接管，
/// 不会永久阻塞该爬虫的后续运行。
#[async_trait]
pub trait LeaseRepository: Send + Sync {
    /// 尝试获取租约
    ///
    /// 原子操作：不存在则插入；已过期或本就由holder持有则接管续期；
    /// 否则获取失败。
    ///
    /// # 返回值
    ///
    /// * `Ok(true)` - 获取成功
    /// * `Ok(false)` - 租约由其他持有者占用且未过期
    async fn acquire(
        &self,
        crawler_id: Uuid,
        holder: Uuid,
        ttl: Duration,
    ) -> Result<bool, RepositoryError>;

    /// 释放租约
    ///
    /// 只释放holder自己持有的租约；他人租约不受影响
    async fn release(&self, crawler_id: Uuid, holder: Uuid) -> Result<(), RepositoryError>;
}
