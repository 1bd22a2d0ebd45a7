//! Table availability - 区间重叠检查与选桌策略
//!
//! 纯函数，无 I/O，无副作用，可并发调用。准入工作流在持有租约时
//! 调用这两个函数得出候选桌台；确认流程在确认时刻重跑同一检查。
//!
//! 区间语义为半开区间 `[start, end)`：首尾相接的两个窗口不冲突
//! (18:00–20:00 与 20:00–22:00 可共用同一桌台)。

use std::collections::HashSet;

use shared::models::{Booking, BookingStatus, RestaurantTable};

/// 半开区间重叠判定
///
/// `[a_start, a_end)` 与 `[b_start, b_end)` 重叠当且仅当
/// `a_start < b_end && b_start < a_end` (严格不等号)。
pub fn overlaps(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> bool {
    a_start < b_end && b_start < a_end
}

/// 计算窗口内的空闲桌台
///
/// `candidates` 已由上游过滤：目标餐厅、激活状态、座位数达标。
/// `bookings` 已由上游过滤：状态非 CANCELLED、桌台属于 candidates。
/// 两个过滤条件在这里再各做一次防御性判断，代价可忽略。
///
/// 返回 candidates 减去被占用集合，保持输入顺序。
/// 空候选集返回空结果，不是错误。
pub fn free_tables(
    candidates: &[RestaurantTable],
    bookings: &[Booking],
    start: i64,
    end: i64,
) -> Vec<RestaurantTable> {
    let busy: HashSet<&str> = bookings
        .iter()
        .filter(|b| b.status != BookingStatus::Cancelled)
        .filter(|b| overlaps(b.start_time, b.end_time, start, end))
        .filter_map(|b| b.table_id.as_deref())
        .collect();

    candidates
        .iter()
        .filter(|t| !busy.contains(t.id.as_str()))
        .cloned()
        .collect()
}

/// 选桌策略：座位数最小者优先
///
/// 2 人的聚会不应占用 8 座桌。并列时取输入顺序中靠前者，
/// 配合 [`TableDirectory::list_active_tables`] 的 (seats, id) 排序
/// 契约，选择结果全链路确定。空集返回 None，由调用方决定准入结果。
///
/// [`TableDirectory::list_active_tables`]: crate::store::TableDirectory::list_active_tables
pub fn select_table(free: &[RestaurantTable]) -> Option<&RestaurantTable> {
    free.iter().min_by_key(|t| t.seats)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;

    fn table(id: &str, seats: i32) -> RestaurantTable {
        RestaurantTable {
            id: id.to_string(),
            restaurant_id: "r1".to_string(),
            label: format!("Table {id}"),
            seats,
            is_active: true,
        }
    }

    fn booking_on(table_id: &str, start: i64, end: i64, status: BookingStatus) -> Booking {
        Booking {
            id: format!("b-{table_id}-{start}"),
            restaurant_id: "r1".to_string(),
            user_id: "u1".to_string(),
            table_id: Some(table_id.to_string()),
            party_size: 2,
            start_time: start,
            end_time: end,
            status,
            created_at: 0,
        }
    }

    #[test]
    fn test_overlap_strict_half_open() {
        // touching endpoints do not conflict
        assert!(!overlaps(18 * HOUR, 20 * HOUR, 20 * HOUR, 22 * HOUR));
        assert!(!overlaps(20 * HOUR, 22 * HOUR, 18 * HOUR, 20 * HOUR));
        // partial overlap
        assert!(overlaps(19 * HOUR, 21 * HOUR, 20 * HOUR, 22 * HOUR));
        // containment
        assert!(overlaps(18 * HOUR, 22 * HOUR, 19 * HOUR, 20 * HOUR));
        // identical
        assert!(overlaps(19 * HOUR, 21 * HOUR, 19 * HOUR, 21 * HOUR));
    }

    #[test]
    fn test_free_tables_excludes_busy() {
        let tables = vec![table("A", 2), table("B", 6)];
        let bookings = vec![booking_on(
            "A",
            19 * HOUR,
            21 * HOUR,
            BookingStatus::Confirmed,
        )];

        // 19:30–20:30 overlaps the 19:00–21:00 booking on A
        let free = free_tables(&tables, &bookings, 19 * HOUR + HOUR / 2, 20 * HOUR + HOUR / 2);
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].id, "B");
    }

    #[test]
    fn test_free_tables_touching_boundary_admitted() {
        let tables = vec![table("A", 4)];
        let bookings = vec![booking_on(
            "A",
            18 * HOUR,
            20 * HOUR,
            BookingStatus::Confirmed,
        )];

        // 20:00–22:00 touches but does not overlap 18:00–20:00
        let free = free_tables(&tables, &bookings, 20 * HOUR, 22 * HOUR);
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].id, "A");
    }

    #[test]
    fn test_free_tables_ignores_cancelled() {
        let tables = vec![table("A", 4)];
        let bookings = vec![booking_on(
            "A",
            19 * HOUR,
            21 * HOUR,
            BookingStatus::Cancelled,
        )];

        let free = free_tables(&tables, &bookings, 19 * HOUR, 21 * HOUR);
        assert_eq!(free.len(), 1);
    }

    #[test]
    fn test_free_tables_pending_blocks_too() {
        // any non-cancelled assignment claims the table
        let tables = vec![table("A", 4)];
        let bookings = vec![booking_on(
            "A",
            19 * HOUR,
            21 * HOUR,
            BookingStatus::Pending,
        )];

        let free = free_tables(&tables, &bookings, 20 * HOUR, 22 * HOUR - HOUR / 2);
        assert!(free.is_empty());
    }

    #[test]
    fn test_free_tables_empty_candidates() {
        let free = free_tables(&[], &[], 19 * HOUR, 21 * HOUR);
        assert!(free.is_empty());
    }

    #[test]
    fn test_free_tables_preserves_order() {
        let tables = vec![table("C", 8), table("A", 2), table("B", 6)];
        let free = free_tables(&tables, &[], 19 * HOUR, 21 * HOUR);
        let ids: Vec<&str> = free.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_select_smallest_adequate() {
        // party of 2: Table A (2 seats) preferred over Table B (6 seats)
        let free = vec![table("B", 6), table("A", 2)];
        let selected = select_table(&free).unwrap();
        assert_eq!(selected.id, "A");
    }

    #[test]
    fn test_select_tie_break_is_stable() {
        let free = vec![table("B", 4), table("A", 4)];
        // both have 4 seats: the first in input order wins
        let selected = select_table(&free).unwrap();
        assert_eq!(selected.id, "B");
    }

    #[test]
    fn test_select_empty_returns_none() {
        assert!(select_table(&[]).is_none());
    }
}
