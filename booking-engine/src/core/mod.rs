//! Engine configuration

pub mod config;

pub use config::{AdmissionPolicy, BookingConfig};
