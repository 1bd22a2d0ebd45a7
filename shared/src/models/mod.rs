//! Data models
//!
//! Shared between the booking engine and its callers (via API).
//! All timestamps are `i64` Unix millis; conversion from calendar
//! dates happens at the caller boundary, never in the stores.

pub mod booking;
pub mod notification;
pub mod restaurant_table;
pub mod waitlist;

// Re-exports
pub use booking::*;
pub use notification::*;
pub use restaurant_table::*;
pub use waitlist::*;
