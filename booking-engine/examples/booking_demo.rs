//! Booking Demo - 预订引擎端到端演示
//!
//! 在内存存储上走完整个预订流程:
//! 1. 可用性探测 (重叠检查 + 选桌)
//! 2. Deferred 模式创建 (PENDING 不绑桌)
//! 3. 店主确认 (确认时刻重跑检查并排桌)
//! 4. 取消与重复取消
//! 5. 候补队列
//!
//! 运行: cargo run -p booking-engine --example booking_demo

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use booking_engine::{
    AdmissionPolicy, BookingConfig, BookingService, InMemoryBookingStore, InMemoryLeaseStore,
    InMemoryTableDirectory, InMemoryWaitlistStore, LogSink, NotificationService,
    NotificationWorker, WaitlistService,
};
use booking_engine::utils::time::window_from_date_time;
use shared::models::{BookingRequest, RestaurantTable, WaitlistRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    booking_engine::init_logger();

    println!("=== Booking Engine Demo ===\n");

    // === 1. 构建服务 ===
    println!("1. Building services (in-memory stores, deferred admission)...");
    let mut config = BookingConfig::from_env();
    config.admission_policy = AdmissionPolicy::Deferred;

    let tables = Arc::new(InMemoryTableDirectory::new());
    for (id, label, seats) in [
        ("t-window", "Window 2-top", 2),
        ("t-center", "Center 4-top", 4),
        ("t-round", "Round 8-top", 8),
    ] {
        tables.insert(RestaurantTable {
            id: id.to_string(),
            restaurant_id: "casa-luca".to_string(),
            label: label.to_string(),
            seats,
            is_active: true,
        });
    }
    let bookings = Arc::new(InMemoryBookingStore::new());
    let leases = Arc::new(InMemoryLeaseStore::new());
    let waitlist_store = Arc::new(InMemoryWaitlistStore::new());

    let (notifications, notify_rx) = NotificationService::channel(config.notify_queue_capacity);
    let service = BookingService::new(
        config.clone(),
        tables,
        bookings,
        leases,
        notifications.clone(),
    );
    let waitlist = WaitlistService::new(waitlist_store, notifications);

    // 通知 worker 后台消费 (LogSink 落日志)
    let shutdown = CancellationToken::new();
    let worker = NotificationWorker::from_config(Arc::new(LogSink), &config);
    let worker_handle = tokio::spawn(worker.run(notify_rx, shutdown.clone()));
    println!("   Services ready.\n");

    // === 2. 可用性探测 ===
    println!("2. Checking availability for Friday 19:00, party of 2...");
    let (start, end) = window_from_date_time("2026-08-07", "19:00", config.default_duration_min)?;
    let availability = service
        .check_availability("casa-luca", start, end, 2)
        .await?;
    println!(
        "   available={}, free tables: {:?}\n",
        availability.available,
        availability
            .free_tables
            .iter()
            .map(|t| t.label.as_str())
            .collect::<Vec<_>>()
    );

    // === 3. 创建预订 (deferred → PENDING) ===
    println!("3. Creating a booking...");
    let booking = service
        .create_booking(BookingRequest {
            restaurant_id: "casa-luca".to_string(),
            user_id: "alice".to_string(),
            start_time: start,
            end_time: end,
            party_size: 2,
        })
        .await?;
    println!(
        "   booking {} status={:?} table={:?}\n",
        booking.id, booking.status, booking.table_id
    );

    // === 4. 店主确认 ===
    println!("4. Owner confirms the booking...");
    let confirmation = service.confirm_booking(&booking.id, None).await?;
    println!(
        "   status={:?} table={:?} via {:?}\n",
        confirmation.booking.status, confirmation.booking.table_id, confirmation.assignment
    );

    // === 5. 取消与重复取消 ===
    println!("5. Cancelling, then cancelling again...");
    service.cancel_booking(&booking.id).await?;
    match service.cancel_booking(&booking.id).await {
        Err(e) => println!("   second cancel rejected: {e}\n"),
        Ok(_) => unreachable!("double cancel must be rejected"),
    }

    // === 6. 候补队列 ===
    println!("6. Joining the waitlist and notifying...");
    let entry = waitlist
        .join(WaitlistRequest {
            restaurant_id: "casa-luca".to_string(),
            user_id: "bob".to_string(),
            party_size: 4,
            requested_time: start,
        })
        .await?;
    println!("   joined at position {}", entry.position);
    waitlist.notify_entry(&entry.id, "Casa Luca").await?;
    println!("   entry notified\n");

    // === 7. 关闭 ===
    println!("7. Shutting down...");
    shutdown.cancel();
    worker_handle.await?;
    println!("   Done.");

    Ok(())
}
