//! Input validation helpers
//!
//! 准入前的 fail-fast 校验。非正时长与非正人数是调用方错误，
//! 不进入租约临界区。

use crate::bookings::{BookingError, BookingResult};

/// 校验预订窗口：end 必须严格大于 start (半开区间非空)
pub fn validate_window(start: i64, end: i64) -> BookingResult<()> {
    if end <= start {
        return Err(BookingError::Validation(format!(
            "Booking window must have positive duration (start {start}, end {end})"
        )));
    }
    Ok(())
}

/// 校验人数为正
pub fn validate_party_size(party_size: i32) -> BookingResult<()> {
    if party_size <= 0 {
        return Err(BookingError::Validation(format!(
            "Party size must be positive (got {party_size})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_window() {
        assert!(validate_window(100, 200).is_ok());
        assert!(validate_window(100, 100).is_err());
        assert!(validate_window(200, 100).is_err());
    }

    #[test]
    fn test_validate_party_size() {
        assert!(validate_party_size(1).is_ok());
        assert!(validate_party_size(0).is_err());
        assert!(validate_party_size(-2).is_err());
    }
}
