//! Shared types for the TableTrek booking engine
//!
//! Data models and small utilities used by the engine crate and by
//! anything that talks to it in-process (API layer, workers, tests).

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
