//! Notification Event Payloads
//!
//! Queued by the engine after a booking decision commits; consumed by the
//! notification worker. Delivery transports (email/SMS) live downstream.

use serde::{Deserialize, Serialize};

/// Notification queued after a booking or waitlist decision
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    BookingPending { booking_id: String },
    BookingConfirmed { booking_id: String },
    BookingCancelled { booking_id: String },
    WaitlistNotify { entry_id: String, message: String },
}

impl NotificationEvent {
    /// Stable kind tag for logging and routing
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::BookingPending { .. } => "booking_pending",
            NotificationEvent::BookingConfirmed { .. } => "booking_confirmed",
            NotificationEvent::BookingCancelled { .. } => "booking_cancelled",
            NotificationEvent::WaitlistNotify { .. } => "waitlist_notify",
        }
    }
}
