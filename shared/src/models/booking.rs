//! Booking Model

use serde::{Deserialize, Serialize};

/// Booking lifecycle status
///
/// `Cancelled` is terminal; `Confirmed` may still be cancelled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// Table reservation record (预订)
///
/// `[start_time, end_time)` is half-open: touching windows on the same
/// table do not conflict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Booking {
    pub id: String,
    pub restaurant_id: String,
    pub user_id: String,
    /// Assigned table — `None` until confirmation in deferred mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    pub party_size: i32,
    /// Window start, Unix millis (inclusive)
    pub start_time: i64,
    /// Window end, Unix millis (exclusive)
    pub end_time: i64,
    pub status: BookingStatus,
    pub created_at: i64,
}

/// Booking creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub restaurant_id: String,
    pub user_id: String,
    pub start_time: i64,
    pub end_time: i64,
    pub party_size: i32,
}
