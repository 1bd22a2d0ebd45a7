//! 时间工具函数 — 日期/时间字符串与 Unix millis 互转
//!
//! 日期→时间戳转换统一在调用层完成，store 层只接收 `i64` Unix
//! millis。解析按 UTC 处理；业务时区换算是调用层的事。

use chrono::{DateTime, NaiveDate, NaiveTime};

use crate::bookings::{BookingError, BookingResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> BookingResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| BookingError::Validation(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM)
pub fn parse_time(time: &str) -> BookingResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| BookingError::Validation(format!("Invalid time format: {}", time)))
}

/// 日期 + 时间 → `[start, start + duration_min)` 窗口 (UTC millis)
///
/// 原始请求只给 (date, time) 时的窗口构造，默认时长见
/// `BookingConfig::default_duration_min`。
pub fn window_from_date_time(
    date: &str,
    time: &str,
    duration_min: i64,
) -> BookingResult<(i64, i64)> {
    let start = parse_date(date)?
        .and_time(parse_time(time)?)
        .and_utc()
        .timestamp_millis();
    Ok((start, start + duration_min * 60_000))
}

/// Unix millis → "YYYY-MM-DD HH:MM" (UTC)，非法时间戳原样返回数字
pub fn format_millis(ts: i64) -> String {
    DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_from_date_time() {
        let (start, end) = window_from_date_time("2026-08-06", "19:00", 120).unwrap();
        assert_eq!(end - start, 2 * 3_600_000);
        assert_eq!(format_millis(start), "2026-08-06 19:00");
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(matches!(
            window_from_date_time("06/08/2026", "19:00", 120),
            Err(BookingError::Validation(_))
        ));
        assert!(matches!(
            window_from_date_time("2026-08-06", "7pm", 120),
            Err(BookingError::Validation(_))
        ));
    }
}
