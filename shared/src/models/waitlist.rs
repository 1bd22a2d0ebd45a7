//! Waitlist Entry Model

use serde::{Deserialize, Serialize};

/// Waitlist entry status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaitlistStatus {
    #[default]
    Pending,
    Notified,
    Cancelled,
}

/// Waitlist entry for a restaurant + requested time slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaitlistEntry {
    pub id: String,
    pub restaurant_id: String,
    pub user_id: String,
    pub party_size: i32,
    /// Requested slot, Unix millis
    pub requested_time: i64,
    /// 1-based queue position per (restaurant, requested_time)
    pub position: i32,
    pub status: WaitlistStatus,
    pub created_at: i64,
}

/// Waitlist join payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistRequest {
    pub restaurant_id: String,
    pub user_id: String,
    pub party_size: i32,
    pub requested_time: i64,
}
