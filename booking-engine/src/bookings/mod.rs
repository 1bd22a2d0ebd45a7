//! Booking admission and lifecycle - 预订准入与生命周期
//!
//! - **error**: 错误分类 (typed results，调用层映射到传输层响应)
//! - **lifecycle**: 状态机 PENDING → CONFIRMED/CANCELLED, CONFIRMED → CANCELLED
//! - **service**: 准入工作流 (租约 → 重叠检查 → 选桌 → 落库 → 通知)

pub mod error;
pub mod lifecycle;
pub mod service;

pub use error::{BookingError, BookingResult};
pub use service::{Assignment, Availability, BookingService, Confirmation};
