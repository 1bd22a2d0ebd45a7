//! Booking lifecycle state machine - 预订状态机
//!
//! ```text
//! PENDING ──→ CONFIRMED ──→ CANCELLED (terminal)
//!    └──────────────────────────↑
//! ```
//!
//! 谁有权触发迁移 (店主/顾客) 是调用层的授权问题，这里只守护状态图。

use shared::models::BookingStatus;

use super::{BookingError, BookingResult};

/// 状态图允许的迁移
pub fn can_transition(from: BookingStatus, to: BookingStatus) -> bool {
    matches!(
        (from, to),
        (BookingStatus::Pending, BookingStatus::Confirmed)
            | (BookingStatus::Pending, BookingStatus::Cancelled)
            | (BookingStatus::Confirmed, BookingStatus::Cancelled)
    )
}

/// 校验迁移，不允许时给出分类错误
///
/// 源状态为 CANCELLED 的任何迁移都是 `AlreadyCancelled` (重复取消
/// 必须显式拒绝，不能静默接受)；其余非法迁移是 `InvalidTransition`。
pub fn ensure_transition(id: &str, from: BookingStatus, to: BookingStatus) -> BookingResult<()> {
    if can_transition(from, to) {
        return Ok(());
    }
    if from == BookingStatus::Cancelled {
        return Err(BookingError::AlreadyCancelled(id.to_string()));
    }
    Err(BookingError::InvalidTransition { from, to })
}
