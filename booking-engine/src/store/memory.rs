//! In-memory store implementations - 内存存储实现
//!
//! 测试与单节点部署用。`RwLock<HashMap>` 足以提供重叠查询需要的
//! read-committed 视图；跨进程一致性是注入真实存储后端的理由。

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use shared::models::{Booking, BookingStatus, RestaurantTable, WaitlistEntry, WaitlistStatus};

use super::{BookingStore, StoreResult, TableDirectory, WaitlistStore};
use crate::availability::overlaps;

/// 内存桌台目录
#[derive(Debug, Default)]
pub struct InMemoryTableDirectory {
    tables: RwLock<HashMap<String, RestaurantTable>>,
}

impl InMemoryTableDirectory {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// 写入或覆盖一张桌台 (测试/演示播种用)
    pub fn insert(&self, table: RestaurantTable) {
        self.tables.write().insert(table.id.clone(), table);
    }
}

#[async_trait]
impl TableDirectory for InMemoryTableDirectory {
    async fn list_active_tables(
        &self,
        restaurant_id: &str,
        min_seats: i32,
    ) -> StoreResult<Vec<RestaurantTable>> {
        let mut tables: Vec<RestaurantTable> = self
            .tables
            .read()
            .values()
            .filter(|t| t.restaurant_id == restaurant_id && t.is_active && t.seats >= min_seats)
            .cloned()
            .collect();
        tables.sort_by(|a, b| a.seats.cmp(&b.seats).then_with(|| a.id.cmp(&b.id)));
        Ok(tables)
    }

    async fn find_table(&self, id: &str) -> StoreResult<Option<RestaurantTable>> {
        Ok(self.tables.read().get(id).cloned())
    }
}

/// 内存预订存储
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    bookings: RwLock<HashMap<String, Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self {
            bookings: RwLock::new(HashMap::new()),
        }
    }

    /// 全量快照 (测试做不变式全扫用)
    pub fn all(&self) -> Vec<Booking> {
        self.bookings.read().values().cloned().collect()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn find_overlapping(
        &self,
        restaurant_id: &str,
        table_ids: &[String],
        start: i64,
        end: i64,
    ) -> StoreResult<Vec<Booking>> {
        Ok(self
            .bookings
            .read()
            .values()
            .filter(|b| b.restaurant_id == restaurant_id)
            .filter(|b| b.status != BookingStatus::Cancelled)
            .filter(|b| {
                b.table_id
                    .as_ref()
                    .is_some_and(|t| table_ids.iter().any(|id| id == t))
            })
            .filter(|b| overlaps(b.start_time, b.end_time, start, end))
            .cloned()
            .collect())
    }

    async fn insert(&self, booking: Booking) -> StoreResult<Booking> {
        self.bookings
            .write()
            .insert(booking.id.clone(), booking.clone());
        Ok(booking)
    }

    async fn update_status(
        &self,
        id: &str,
        status: BookingStatus,
        table_id: Option<String>,
    ) -> StoreResult<Option<Booking>> {
        let mut bookings = self.bookings.write();
        let Some(booking) = bookings.get_mut(id) else {
            return Ok(None);
        };
        booking.status = status;
        if let Some(table) = table_id {
            booking.table_id = Some(table);
        }
        Ok(Some(booking.clone()))
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Booking>> {
        Ok(self.bookings.read().get(id).cloned())
    }
}

/// 内存候补队列存储
#[derive(Debug, Default)]
pub struct InMemoryWaitlistStore {
    entries: RwLock<HashMap<String, WaitlistEntry>>,
}

impl InMemoryWaitlistStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl WaitlistStore for InMemoryWaitlistStore {
    async fn find_pending(
        &self,
        restaurant_id: &str,
        user_id: &str,
        requested_time: i64,
    ) -> StoreResult<Option<WaitlistEntry>> {
        Ok(self
            .entries
            .read()
            .values()
            .find(|e| {
                e.restaurant_id == restaurant_id
                    && e.user_id == user_id
                    && e.requested_time == requested_time
                    && e.status == WaitlistStatus::Pending
            })
            .cloned())
    }

    async fn count_pending(&self, restaurant_id: &str, requested_time: i64) -> StoreResult<i32> {
        Ok(self
            .entries
            .read()
            .values()
            .filter(|e| {
                e.restaurant_id == restaurant_id
                    && e.requested_time == requested_time
                    && e.status == WaitlistStatus::Pending
            })
            .count() as i32)
    }

    async fn insert(&self, entry: WaitlistEntry) -> StoreResult<WaitlistEntry> {
        self.entries.write().insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn update_status(
        &self,
        id: &str,
        status: WaitlistStatus,
    ) -> StoreResult<Option<WaitlistEntry>> {
        let mut entries = self.entries.write();
        let Some(entry) = entries.get_mut(id) else {
            return Ok(None);
        };
        entry.status = status;
        Ok(Some(entry.clone()))
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<WaitlistEntry>> {
        Ok(self.entries.read().get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(id: &str, restaurant_id: &str, seats: i32, is_active: bool) -> RestaurantTable {
        RestaurantTable {
            id: id.to_string(),
            restaurant_id: restaurant_id.to_string(),
            label: id.to_string(),
            seats,
            is_active,
        }
    }

    #[tokio::test]
    async fn test_list_active_tables_filters_and_sorts() {
        let dir = InMemoryTableDirectory::new();
        dir.insert(table("t-big", "r1", 8, true));
        dir.insert(table("t-small", "r1", 2, true));
        dir.insert(table("t-mid", "r1", 4, true));
        dir.insert(table("t-off", "r1", 6, false));
        dir.insert(table("t-other", "r2", 4, true));

        let tables = dir.list_active_tables("r1", 3).await.unwrap();
        let ids: Vec<&str> = tables.iter().map(|t| t.id.as_str()).collect();
        // 2-seat filtered out by min_seats, inactive and foreign tables gone,
        // rest ordered by seats
        assert_eq!(ids, vec!["t-mid", "t-big"]);
    }

    #[tokio::test]
    async fn test_find_overlapping_restricted_to_tables() {
        let store = InMemoryBookingStore::new();
        let booking = Booking {
            id: "b1".to_string(),
            restaurant_id: "r1".to_string(),
            user_id: "u1".to_string(),
            table_id: Some("t1".to_string()),
            party_size: 2,
            start_time: 100,
            end_time: 200,
            status: BookingStatus::Confirmed,
            created_at: 0,
        };
        store.insert(booking).await.unwrap();

        let hit = store
            .find_overlapping("r1", &["t1".to_string()], 150, 250)
            .await
            .unwrap();
        assert_eq!(hit.len(), 1);

        // other table set, touching window, cancelled status: all misses
        assert!(
            store
                .find_overlapping("r1", &["t2".to_string()], 150, 250)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            store
                .find_overlapping("r1", &["t1".to_string()], 200, 300)
                .await
                .unwrap()
                .is_empty()
        );

        store
            .update_status("b1", BookingStatus::Cancelled, None)
            .await
            .unwrap();
        assert!(
            store
                .find_overlapping("r1", &["t1".to_string()], 150, 250)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_update_status_sets_table_assignment() {
        let store = InMemoryBookingStore::new();
        let booking = Booking {
            id: "b1".to_string(),
            restaurant_id: "r1".to_string(),
            user_id: "u1".to_string(),
            table_id: None,
            party_size: 2,
            start_time: 100,
            end_time: 200,
            status: BookingStatus::Pending,
            created_at: 0,
        };
        store.insert(booking).await.unwrap();

        let updated = store
            .update_status("b1", BookingStatus::Confirmed, Some("t1".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, BookingStatus::Confirmed);
        assert_eq!(updated.table_id.as_deref(), Some("t1"));

        // missing id returns None instead of erroring
        assert!(
            store
                .update_status("nope", BookingStatus::Cancelled, None)
                .await
                .unwrap()
                .is_none()
        );
    }
}
