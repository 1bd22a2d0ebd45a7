//! In-memory lease store - 单节点租约存储
//!
//! DashMap entry API 在整个 check-and-set 期间持有分片锁，
//! 天然满足原子性要求。过期判定基于 `tokio::time::Instant`，
//! 测试可用 paused clock 快进。
//!
//! 单进程部署与测试足够；多进程需要分布式缓存实现同一 trait。

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::time::Instant;

use super::{LeaseResult, LeaseStore};

struct LeaseEntry {
    token: String,
    expires_at: Instant,
}

/// 内存租约存储
#[derive(Default)]
pub struct InMemoryLeaseStore {
    entries: DashMap<String, LeaseEntry>,
}

impl InMemoryLeaseStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl std::fmt::Debug for InMemoryLeaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLeaseStore")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[async_trait]
impl LeaseStore for InMemoryLeaseStore {
    async fn try_acquire(&self, key: &str, token: &str, ttl: Duration) -> LeaseResult<bool> {
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().expires_at > now {
                    return Ok(false);
                }
                // 过期条目视同不存在
                occupied.insert(LeaseEntry {
                    token: token.to_string(),
                    expires_at: now + ttl,
                });
                Ok(true)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(LeaseEntry {
                    token: token.to_string(),
                    expires_at: now + ttl,
                });
                Ok(true)
            }
        }
    }

    async fn release(&self, key: &str, token: &str) -> LeaseResult<bool> {
        // remove_if 按分片加锁，比对与删除原子完成
        Ok(self
            .entries
            .remove_if(key, |_, entry| entry.token == token)
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_try_acquire_is_first_wins() {
        let store = InMemoryLeaseStore::new();
        let ttl = Duration::from_millis(60_000);

        assert!(store.try_acquire("k", "t1", ttl).await.unwrap());
        assert!(!store.try_acquire("k", "t2", ttl).await.unwrap());
    }

    #[tokio::test]
    async fn test_release_requires_matching_token() {
        let store = InMemoryLeaseStore::new();
        let ttl = Duration::from_millis(60_000);

        store.try_acquire("k", "t1", ttl).await.unwrap();
        assert!(!store.release("k", "other").await.unwrap());
        assert!(store.release("k", "t1").await.unwrap());
        // second release is a no-op
        assert!(!store.release("k", "t1").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_counts_as_absent() {
        let store = InMemoryLeaseStore::new();

        store
            .try_acquire("k", "t1", Duration::from_millis(1000))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1001)).await;

        assert!(
            store
                .try_acquire("k", "t2", Duration::from_millis(1000))
                .await
                .unwrap()
        );
        // t1's late release must not evict t2
        assert!(!store.release("k", "t1").await.unwrap());
    }
}
