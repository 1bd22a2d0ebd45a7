//! Waitlist - 候补队列
//!
//! 满座时段的候补簿记：同一 (餐厅, 时段) 维护 1 起的排位。
//! 店主看到空桌后通知候补者 (PENDING → NOTIFIED)，顾客可随时退出
//! (→ CANCELLED)。候补条目不参与重叠检查 — 它不占桌台。

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use shared::models::{NotificationEvent, WaitlistEntry, WaitlistRequest, WaitlistStatus};
use shared::util::now_millis;

use crate::bookings::{BookingError, BookingResult};
use crate::notify::NotificationService;
use crate::store::WaitlistStore;
use crate::utils::time::format_millis;
use crate::utils::validation::validate_party_size;

/// 候补队列服务
pub struct WaitlistService {
    entries: Arc<dyn WaitlistStore>,
    notifications: NotificationService,
}

impl std::fmt::Debug for WaitlistService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitlistService").finish_non_exhaustive()
    }
}

impl WaitlistService {
    pub fn new(entries: Arc<dyn WaitlistStore>, notifications: NotificationService) -> Self {
        Self {
            entries,
            notifications,
        }
    }

    /// 加入候补
    ///
    /// 同一用户同一时段重复加入返回 `AlreadyWaitlisted`；
    /// 排位 = 当前 PENDING 数 + 1。
    pub async fn join(&self, req: WaitlistRequest) -> BookingResult<WaitlistEntry> {
        validate_party_size(req.party_size)?;

        if self
            .entries
            .find_pending(&req.restaurant_id, &req.user_id, req.requested_time)
            .await?
            .is_some()
        {
            return Err(BookingError::AlreadyWaitlisted);
        }

        let position = self
            .entries
            .count_pending(&req.restaurant_id, req.requested_time)
            .await?
            + 1;
        let entry = WaitlistEntry {
            id: Uuid::new_v4().to_string(),
            restaurant_id: req.restaurant_id,
            user_id: req.user_id,
            party_size: req.party_size,
            requested_time: req.requested_time,
            position,
            status: WaitlistStatus::Pending,
            created_at: now_millis(),
        };
        let stored = self.entries.insert(entry).await?;

        info!(
            entry_id = %stored.id,
            restaurant_id = %stored.restaurant_id,
            position = stored.position,
            "joined waitlist"
        );
        Ok(stored)
    }

    /// 退出候补 (→ CANCELLED)
    pub async fn leave(&self, id: &str) -> BookingResult<WaitlistEntry> {
        let entry = self
            .entries
            .find_by_id(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
        if entry.status == WaitlistStatus::Cancelled {
            return Err(BookingError::AlreadyCancelled(id.to_string()));
        }

        let updated = self
            .entries
            .update_status(id, WaitlistStatus::Cancelled)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
        info!(entry_id = %updated.id, "left waitlist");
        Ok(updated)
    }

    /// 店主通知候补者有桌可订 (PENDING → NOTIFIED)
    ///
    /// 调用方已校验权限并提供餐厅名用于消息文案。
    pub async fn notify_entry(
        &self,
        id: &str,
        restaurant_name: &str,
    ) -> BookingResult<WaitlistEntry> {
        let entry = self
            .entries
            .find_by_id(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;
        if entry.status != WaitlistStatus::Pending {
            return Err(BookingError::Validation(format!(
                "Waitlist entry {} is not pending",
                id
            )));
        }

        let updated = self
            .entries
            .update_status(id, WaitlistStatus::Notified)
            .await?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        let message = format!(
            "A table is now available at {} for your requested time of {}. \
             Please confirm your reservation within 15 minutes.",
            restaurant_name,
            format_millis(updated.requested_time)
        );
        info!(entry_id = %updated.id, "waitlist entry notified");
        self.notifications.enqueue(NotificationEvent::WaitlistNotify {
            entry_id: updated.id.clone(),
            message,
        });
        Ok(updated)
    }
}
