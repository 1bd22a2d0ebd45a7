use thiserror::Error;

use shared::models::BookingStatus;

use crate::lease::LeaseError;
use crate::store::StoreError;

/// Booking engine errors
///
/// 全部作为 typed result 返回给调用层，由调用层映射为传输层响应；
/// 引擎内部不吞错误。
#[derive(Debug, Error)]
pub enum BookingError {
    /// 参数不合法 (窗口非正、人数非正) — 调用方可修复，重试无益
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 租约在重试预算内未获取到 — 瞬态，调用方应稍后整体重试
    #[error("Could not acquire booking lease, try again")]
    LockContention,

    /// 请求窗口内没有合适的空桌 — 本次请求终态
    #[error("No table available for the requested window")]
    NoAvailability,

    /// 预订不存在
    #[error("Booking not found: {0}")]
    NotFound(String),

    /// 已取消的预订不允许再变更
    #[error("Already cancelled: {0}")]
    AlreadyCancelled(String),

    /// 状态机不允许的迁移
    #[error("Invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// 同一用户同一时段重复候补
    #[error("Already on the waitlist for this time")]
    AlreadyWaitlisted,

    /// 存储层失败 — 瞬态，租约已在传播前释放
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// 租约存储失败 — 瞬态
    #[error("Lease error: {0}")]
    Lease(#[from] LeaseError),
}

impl BookingError {
    /// 调用方延迟后重试是否有意义
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BookingError::LockContention | BookingError::Store(_) | BookingError::Lease(_)
        )
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(BookingError::LockContention.is_retryable());
        assert!(BookingError::Store(StoreError::Backend("down".into())).is_retryable());
        assert!(!BookingError::NoAvailability.is_retryable());
        assert!(!BookingError::Validation("bad window".into()).is_retryable());
        assert!(!BookingError::AlreadyCancelled("b1".into()).is_retryable());
    }
}
