//! Restaurant Table Model

use serde::{Deserialize, Serialize};

/// Physical dining table offered for reservations (桌台)
///
/// Inactive tables are never offered to the availability checker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestaurantTable {
    pub id: String,
    pub restaurant_id: String,
    pub label: String,
    pub seats: i32,
    pub is_active: bool,
}
