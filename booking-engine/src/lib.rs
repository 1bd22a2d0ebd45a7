//! TableTrek Booking Engine - 餐厅预订冲突决策引擎
//!
//! # 架构概述
//!
//! 本 crate 实现餐桌可用性检查与预订准入的核心逻辑：
//!
//! - **可用性** (`availability`): 纯函数的区间重叠检查与选桌策略
//! - **租约锁** (`lease`): 基于租约的分布式互斥锁，串行化 check-then-reserve
//! - **预订** (`bookings`): 准入工作流与生命周期状态机
//! - **候补** (`waitlist`): 满座时的候补队列
//! - **通知** (`notify`): fire-and-forget 通知队列与后台 worker
//!
//! # Admission Flow
//!
//! ```text
//! create_booking(req)
//!     ├─ 1. Validate window and party size
//!     ├─ 2. Acquire lease for (restaurant, start, party_size)
//!     ├─ 3. Load candidate tables + overlapping bookings
//!     ├─ 4. free_tables() → select_table()
//!     ├─ 5. Persist CONFIRMED (immediate) or PENDING (deferred)
//!     ├─ 6. Release lease (always, on every path)
//!     └─ 7. Enqueue notification (fire-and-forget)
//! ```
//!
//! # 模块结构
//!
//! ```text
//! booking-engine/src/
//! ├── core/          # 配置
//! ├── availability/  # 重叠检查、选桌策略 (纯函数)
//! ├── lease/         # 租约锁 + 内存实现
//! ├── store/         # 协作者 trait + 内存实现
//! ├── bookings/      # 准入工作流、状态机、错误
//! ├── waitlist/      # 候补队列
//! ├── notify/        # 通知队列与 worker
//! └── utils/         # 日志、时间、校验
//! ```

pub mod availability;
pub mod bookings;
pub mod core;
pub mod lease;
pub mod notify;
pub mod store;
pub mod utils;
pub mod waitlist;

// Re-export 公共类型
pub use bookings::{
    Assignment, Availability, BookingError, BookingResult, BookingService, Confirmation,
};
pub use crate::core::{AdmissionPolicy, BookingConfig};
pub use lease::{InMemoryLeaseStore, LeaseLock, LeaseStore, LeaseToken, booking_lock_key};
pub use notify::{LogSink, NotificationService, NotificationSink, NotificationWorker};
pub use store::{
    BookingStore, InMemoryBookingStore, InMemoryTableDirectory, InMemoryWaitlistStore, StoreError,
    StoreResult, TableDirectory, WaitlistStore,
};
pub use waitlist::WaitlistService;

// Re-export logger functions
pub use utils::logger::init_logger;
