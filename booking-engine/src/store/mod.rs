//! Collaborator store traits - 协作者接口
//!
//! 持久化技术是外部关注点：引擎只依赖这里的 trait，由部署方注入
//! 实现。内存实现 (`memory`) 服务于测试与单节点场景。
//!
//! 重叠查询要求存储后端至少提供 read-committed 一致性，
//! 否则准入检查读到的集合无意义。

pub mod memory;

pub use memory::{InMemoryBookingStore, InMemoryTableDirectory, InMemoryWaitlistStore};

use async_trait::async_trait;
use thiserror::Error;

use shared::models::{Booking, BookingStatus, RestaurantTable, WaitlistEntry, WaitlistStatus};

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 桌台目录
#[async_trait]
pub trait TableDirectory: Send + Sync {
    /// 目标餐厅的激活桌台，座位数 >= min_seats，
    /// 按 (seats, id) 升序 — 选桌策略的确定性依赖此契约。
    async fn list_active_tables(
        &self,
        restaurant_id: &str,
        min_seats: i32,
    ) -> StoreResult<Vec<RestaurantTable>>;

    async fn find_table(&self, id: &str) -> StoreResult<Option<RestaurantTable>>;
}

/// 预订存储
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// 非 CANCELLED、桌台属于 `table_ids`、与 `[start, end)` 重叠的预订
    async fn find_overlapping(
        &self,
        restaurant_id: &str,
        table_ids: &[String],
        start: i64,
        end: i64,
    ) -> StoreResult<Vec<Booking>>;

    async fn insert(&self, booking: Booking) -> StoreResult<Booking>;

    /// 更新状态；`table_id` 为 `Some` 时同时落桌台指派
    async fn update_status(
        &self,
        id: &str,
        status: BookingStatus,
        table_id: Option<String>,
    ) -> StoreResult<Option<Booking>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Booking>>;
}

/// 候补队列存储
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// 同一用户在同一餐厅同一时段的 PENDING 条目 (去重检查)
    async fn find_pending(
        &self,
        restaurant_id: &str,
        user_id: &str,
        requested_time: i64,
    ) -> StoreResult<Option<WaitlistEntry>>;

    /// 同一餐厅同一时段的 PENDING 条目数 (排位计算)
    async fn count_pending(&self, restaurant_id: &str, requested_time: i64) -> StoreResult<i32>;

    async fn insert(&self, entry: WaitlistEntry) -> StoreResult<WaitlistEntry>;

    async fn update_status(
        &self,
        id: &str,
        status: WaitlistStatus,
    ) -> StoreResult<Option<WaitlistEntry>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<WaitlistEntry>>;
}
