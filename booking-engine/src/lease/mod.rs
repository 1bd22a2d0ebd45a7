//! Lease-based distributed mutual exclusion - 租约互斥锁
//!
//! check-then-reserve 序列对存储层不是原子的：同一 (餐厅, 窗口, 人数)
//! 的两个并发请求可能都观察到"有空桌"并双双落库。租约锁串行化这段
//! 临界区。锁是建议性的 — 正确性由重叠检查保证，锁只是防止检查结果
//! 在途中失效。
//!
//! 键粒度为 (restaurant, start, party_size)：比整店锁细，又避免了
//! 按桌加锁的循环依赖 (选桌之前不知道桌台)。不相关的组合互不竞争。
//!
//! 崩溃安全：持有者未释放即退出时，TTL 到期后租约自动失效，
//! 不存在永久死锁。获取顺序不保证 FIFO，只保证互斥。

pub mod memory;

pub use memory::InMemoryLeaseStore;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::core::BookingConfig;

/// Lease store errors
#[derive(Debug, Error)]
pub enum LeaseError {
    #[error("Lease store error: {0}")]
    Backend(String),
}

pub type LeaseResult<T> = Result<T, LeaseError>;

/// Opaque ownership proof returned by a successful acquire
///
/// Release is conditional on the token so a holder can never delete a
/// lease that expired and was re-acquired by someone else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaseToken(String);

impl LeaseToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 租约存储原语
///
/// 两个操作对并发调用者都必须是原子的。内存实现见
/// [`InMemoryLeaseStore`]；多进程部署需要分布式缓存后端
/// (同一 trait，SET NX PX + 条件删除脚本)。
#[async_trait]
pub trait LeaseStore: Send + Sync {
    /// Atomically set `key -> token` with expiry `ttl`, only if the key
    /// is absent (expired entries count as absent). Returns whether the
    /// caller won the lease.
    async fn try_acquire(&self, key: &str, token: &str, ttl: Duration) -> LeaseResult<bool>;

    /// Atomically delete `key` only if its current value equals `token`.
    /// Returns whether a matching lease was deleted.
    async fn release(&self, key: &str, token: &str) -> LeaseResult<bool>;
}

/// 构造预订锁键
///
/// `booking_lock:{restaurant}:{start_millis}:{party_size}` —
/// start 已是归一化的 Unix millis，不同元组互不竞争。
pub fn booking_lock_key(restaurant_id: &str, start_time: i64, party_size: i32) -> String {
    format!("booking_lock:{restaurant_id}:{start_time}:{party_size}")
}

/// 带重试的租约锁
///
/// 有界轮询：最多 `max_attempts` 次尝试，失败后睡 `retry_interval`
/// 再试，耗尽返回 `None` (调用方应以"稍后重试"信号失败，绝不
/// 静默继续)。
pub struct LeaseLock {
    store: Arc<dyn LeaseStore>,
    ttl: Duration,
    retry_interval: Duration,
    max_attempts: u32,
}

impl std::fmt::Debug for LeaseLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaseLock")
            .field("ttl", &self.ttl)
            .field("retry_interval", &self.retry_interval)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl LeaseLock {
    pub fn new(
        store: Arc<dyn LeaseStore>,
        ttl: Duration,
        retry_interval: Duration,
        max_attempts: u32,
    ) -> Self {
        Self {
            store,
            ttl,
            retry_interval,
            max_attempts,
        }
    }

    /// 按配置构造 (TTL / 重试间隔 / 尝试次数)
    pub fn from_config(store: Arc<dyn LeaseStore>, config: &BookingConfig) -> Self {
        Self::new(
            store,
            Duration::from_millis(config.lock_ttl_ms),
            Duration::from_millis(config.lock_retry_interval_ms),
            config.lock_max_attempts,
        )
    }

    /// 尝试获取租约
    ///
    /// 成功返回持有凭证；所有尝试耗尽返回 `Ok(None)`。
    pub async fn acquire(&self, key: &str) -> LeaseResult<Option<LeaseToken>> {
        let token = Uuid::new_v4().to_string();

        for attempt in 1..=self.max_attempts {
            if self.store.try_acquire(key, &token, self.ttl).await? {
                tracing::debug!(key = %key, attempt, "lease acquired");
                return Ok(Some(LeaseToken(token)));
            }
            if attempt < self.max_attempts {
                tokio::time::sleep(self.retry_interval).await;
            }
        }

        tracing::debug!(
            key = %key,
            attempts = self.max_attempts,
            "lease acquisition exhausted"
        );
        Ok(None)
    }

    /// 释放租约 (条件删除)
    ///
    /// 租约已过期并被他人重新获取时返回 `Ok(false)` — 这是已知的
    /// TTL 竞争窗口，记日志即可，绝不能删除他人的租约。
    pub async fn release(&self, key: &str, token: &LeaseToken) -> LeaseResult<bool> {
        let released = self.store.release(key, token.as_str()).await?;
        if !released {
            tracing::warn!(key = %key, "lease expired or re-acquired before release");
        }
        Ok(released)
    }
}
