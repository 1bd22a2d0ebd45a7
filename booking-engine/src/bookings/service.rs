//! BookingService - 预订准入工作流
//!
//! # Admission Flow
//!
//! ```text
//! create_booking(req)
//!     ├─ 1. Validate window / party size
//!     ├─ 2. Acquire lease (restaurant, start, party_size)
//!     ├─ 3. Load tables + overlapping bookings
//!     ├─ 4. free_tables → select_table
//!     ├─ 5. Persist per AdmissionPolicy
//!     ├─ 6. Release lease (every path)
//!     └─ 7. Enqueue notification (fire-and-forget)
//! ```
//!
//! 锁是建议性的：只对走同一协议的调用者生效。确认流程 (店主操作,
//! 低竞争) 不取租约，以确认时刻的重跑检查为准。

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use shared::models::{Booking, BookingRequest, BookingStatus, NotificationEvent, RestaurantTable};
use shared::util::now_millis;

use super::lifecycle;
use super::{BookingError, BookingResult};
use crate::availability::{free_tables, select_table};
use crate::core::{AdmissionPolicy, BookingConfig};
use crate::lease::{LeaseLock, LeaseStore, booking_lock_key};
use crate::notify::NotificationService;
use crate::store::{BookingStore, TableDirectory};
use crate::utils::validation::{validate_party_size, validate_window};

/// 可用性探测结果
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    pub available: bool,
    pub free_tables: Vec<RestaurantTable>,
}

/// 确认时桌台指派的来源
///
/// `ForcedOverbook` 与 `Unassigned` 是显式的超订/兜底通道，
/// 调用方与审计都能把它们与正常选桌区分开。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// 重叠检查选出的空桌
    Selected(String),
    /// 无空桌时的强制排桌 (明知违反不重叠不变式)
    ForcedOverbook(String),
    /// 无任何合适桌台，留待人工处理
    Unassigned,
}

/// 确认结果
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub booking: Booking,
    pub assignment: Assignment,
}

/// 预订准入服务
///
/// 协作者全部注入：桌台目录、预订存储、租约存储、通知队列。
/// 每次调用除租约外无共享可变状态，可被任意多的 worker 并发驱动。
pub struct BookingService {
    config: BookingConfig,
    tables: Arc<dyn TableDirectory>,
    bookings: Arc<dyn BookingStore>,
    lock: LeaseLock,
    notifications: NotificationService,
}

impl std::fmt::Debug for BookingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService")
            .field("admission_policy", &self.config.admission_policy)
            .finish_non_exhaustive()
    }
}

impl BookingService {
    pub fn new(
        config: BookingConfig,
        tables: Arc<dyn TableDirectory>,
        bookings: Arc<dyn BookingStore>,
        leases: Arc<dyn LeaseStore>,
        notifications: NotificationService,
    ) -> Self {
        let lock = LeaseLock::from_config(leases, &config);
        Self {
            config,
            tables,
            bookings,
            lock,
            notifications,
        }
    }

    /// 只读可用性探测 — 不取租约、不落库
    pub async fn check_availability(
        &self,
        restaurant_id: &str,
        start: i64,
        end: i64,
        party_size: i32,
    ) -> BookingResult<Availability> {
        validate_window(start, end)?;
        validate_party_size(party_size)?;

        let free = self.probe_free_tables(restaurant_id, start, end, party_size).await?;
        Ok(Availability {
            available: !free.is_empty(),
            free_tables: free,
        })
    }

    /// 创建预订 (准入工作流)
    ///
    /// 准入结果取决于 [`AdmissionPolicy`]：
    /// - `Immediate`: 无空桌返回 `NoAvailability`，否则落 CONFIRMED 并绑桌
    /// - `Deferred`: 永远落 PENDING 不绑桌，店主确认时再排桌
    pub async fn create_booking(&self, req: BookingRequest) -> BookingResult<Booking> {
        validate_window(req.start_time, req.end_time)?;
        validate_party_size(req.party_size)?;

        let key = booking_lock_key(&req.restaurant_id, req.start_time, req.party_size);
        let Some(token) = self.lock.acquire(&key).await? else {
            info!(key = %key, "booking lease contention exhausted retries");
            return Err(BookingError::LockContention);
        };

        // 临界区：无论结果如何都必须释放租约，
        // 否则后续请求要等到 TTL 过期
        let result = self.admit(&req).await;

        if let Err(e) = self.lock.release(&key, &token).await {
            warn!(key = %key, error = %e, "failed to release booking lease");
        }

        let booking = result?;
        self.notifications.enqueue(match booking.status {
            BookingStatus::Confirmed => NotificationEvent::BookingConfirmed {
                booking_id: booking.id.clone(),
            },
            _ => NotificationEvent::BookingPending {
                booking_id: booking.id.clone(),
            },
        });
        Ok(booking)
    }

    /// 确认预订 (PENDING → CONFIRMED)
    ///
    /// 创建到确认之间可用性可能已经变化，因此在确认时刻重跑重叠
    /// 检查。店主显式指定 `table_override` 时以其为准 (仍校验桌台
    /// 归属与座位数)；无空桌且配置允许时走强制排桌通道。
    pub async fn confirm_booking(
        &self,
        id: &str,
        table_override: Option<&str>,
    ) -> BookingResult<Confirmation> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
        lifecycle::ensure_transition(id, booking.status, BookingStatus::Confirmed)?;

        let assignment = match table_override {
            Some(table_id) => self.assign_explicit(&booking, table_id).await?,
            None => self.assign_from_availability(&booking).await?,
        };

        let table_id = match &assignment {
            Assignment::Selected(t) | Assignment::ForcedOverbook(t) => Some(t.clone()),
            Assignment::Unassigned => None,
        };
        let updated = self
            .bookings
            .update_status(id, BookingStatus::Confirmed, table_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        info!(
            booking_id = %updated.id,
            table_id = ?updated.table_id,
            assignment = ?assignment,
            "booking confirmed"
        );
        self.notifications.enqueue(NotificationEvent::BookingConfirmed {
            booking_id: updated.id.clone(),
        });
        Ok(Confirmation {
            booking: updated,
            assignment,
        })
    }

    /// 取消预订 (PENDING/CONFIRMED → CANCELLED)
    ///
    /// 重复取消返回 `AlreadyCancelled`，不静默接受。
    pub async fn cancel_booking(&self, id: &str) -> BookingResult<Booking> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
        lifecycle::ensure_transition(id, booking.status, BookingStatus::Cancelled)?;

        let updated = self
            .bookings
            .update_status(id, BookingStatus::Cancelled, None)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        info!(booking_id = %updated.id, "booking cancelled");
        self.notifications.enqueue(NotificationEvent::BookingCancelled {
            booking_id: updated.id.clone(),
        });
        Ok(updated)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// 持锁临界区：查表、检查、落库
    async fn admit(&self, req: &BookingRequest) -> BookingResult<Booking> {
        let free = self
            .probe_free_tables(&req.restaurant_id, req.start_time, req.end_time, req.party_size)
            .await?;
        let selected = select_table(&free);

        let (status, table_id) = match self.config.admission_policy {
            AdmissionPolicy::Immediate => {
                let table = selected.ok_or(BookingError::NoAvailability)?;
                (BookingStatus::Confirmed, Some(table.id.clone()))
            }
            AdmissionPolicy::Deferred => (BookingStatus::Pending, None),
        };

        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            restaurant_id: req.restaurant_id.clone(),
            user_id: req.user_id.clone(),
            table_id,
            party_size: req.party_size,
            start_time: req.start_time,
            end_time: req.end_time,
            status,
            created_at: now_millis(),
        };
        let stored = self.bookings.insert(booking).await?;

        info!(
            booking_id = %stored.id,
            restaurant_id = %stored.restaurant_id,
            status = ?stored.status,
            table_id = ?stored.table_id,
            "booking admitted"
        );
        Ok(stored)
    }

    async fn probe_free_tables(
        &self,
        restaurant_id: &str,
        start: i64,
        end: i64,
        party_size: i32,
    ) -> BookingResult<Vec<RestaurantTable>> {
        let candidates = self
            .tables
            .list_active_tables(restaurant_id, party_size)
            .await?;
        let table_ids: Vec<String> = candidates.iter().map(|t| t.id.clone()).collect();
        let overlapping = self
            .bookings
            .find_overlapping(restaurant_id, &table_ids, start, end)
            .await?;
        Ok(free_tables(&candidates, &overlapping, start, end))
    }

    /// 店主显式指定桌台：校验归属/激活/座位数，占用冲突走超订通道
    async fn assign_explicit(
        &self,
        booking: &Booking,
        table_id: &str,
    ) -> BookingResult<Assignment> {
        let table = self
            .tables
            .find_table(table_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(table_id.to_string()))?;
        if table.restaurant_id != booking.restaurant_id {
            return Err(BookingError::Validation(format!(
                "Table {} belongs to another restaurant",
                table_id
            )));
        }
        if !table.is_active {
            return Err(BookingError::Validation(format!(
                "Table {} is not active",
                table_id
            )));
        }
        if table.seats < booking.party_size {
            return Err(BookingError::Validation(format!(
                "Table {} seats {} but party size is {}",
                table_id, table.seats, booking.party_size
            )));
        }

        let conflicting = self
            .bookings
            .find_overlapping(
                &booking.restaurant_id,
                std::slice::from_ref(&table.id),
                booking.start_time,
                booking.end_time,
            )
            .await?;
        if conflicting.is_empty() {
            return Ok(Assignment::Selected(table.id));
        }
        if !self.config.allow_overbook_override {
            return Err(BookingError::NoAvailability);
        }
        warn!(
            target: "audit",
            booking_id = %booking.id,
            table_id = %table.id,
            conflicts = conflicting.len(),
            "overbooking override: owner assigned an occupied table"
        );
        Ok(Assignment::ForcedOverbook(table.id))
    }

    /// 确认时刻重跑重叠检查并选桌
    async fn assign_from_availability(&self, booking: &Booking) -> BookingResult<Assignment> {
        let free = self
            .probe_free_tables(
                &booking.restaurant_id,
                booking.start_time,
                booking.end_time,
                booking.party_size,
            )
            .await?;
        if let Some(table) = select_table(&free) {
            return Ok(Assignment::Selected(table.id.clone()));
        }
        if !self.config.allow_overbook_override {
            return Err(BookingError::NoAvailability);
        }

        // 显式超订通道：强排座位数最小的合适桌台；
        // 一张合适桌台都没有时留空待人工处理
        let candidates = self
            .tables
            .list_active_tables(&booking.restaurant_id, booking.party_size)
            .await?;
        match candidates.first() {
            Some(table) => {
                warn!(
                    target: "audit",
                    booking_id = %booking.id,
                    table_id = %table.id,
                    "overbooking override: no free table, forcing smallest suitable"
                );
                Ok(Assignment::ForcedOverbook(table.id.clone()))
            }
            None => {
                warn!(
                    target: "audit",
                    booking_id = %booking.id,
                    party_size = booking.party_size,
                    "no suitable table exists, confirming unassigned"
                );
                Ok(Assignment::Unassigned)
            }
        }
    }
}
