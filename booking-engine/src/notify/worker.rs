//! Notification worker - 通知后台 worker
//!
//! 消费通知通道，对 sink 做有界指数退避重试，耗尽后丢弃并记错误。
//! 通道关闭或收到 shutdown 信号时退出。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use shared::models::NotificationEvent;

use super::NotificationSink;
use crate::core::BookingConfig;

/// 通知后台 worker
pub struct NotificationWorker {
    sink: Arc<dyn NotificationSink>,
    max_attempts: u32,
    retry_base: Duration,
}

impl NotificationWorker {
    pub fn new(sink: Arc<dyn NotificationSink>, max_attempts: u32, retry_base: Duration) -> Self {
        Self {
            sink,
            max_attempts,
            retry_base,
        }
    }

    /// 按配置构造 (尝试次数 / 初始退避)
    pub fn from_config(sink: Arc<dyn NotificationSink>, config: &BookingConfig) -> Self {
        Self::new(
            sink,
            config.notify_max_attempts,
            Duration::from_millis(config.notify_retry_base_ms),
        )
    }

    /// 运行 worker（阻塞直到通道关闭或 shutdown）
    pub async fn run(
        self,
        mut rx: mpsc::Receiver<NotificationEvent>,
        shutdown: CancellationToken,
    ) {
        tracing::info!("Notification worker started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Notification worker received shutdown signal");
                    break;
                }
                event = rx.recv() => {
                    let Some(event) = event else {
                        tracing::info!("Notification channel closed, worker stopping");
                        break;
                    };
                    self.deliver_with_retry(&event).await;
                }
            }
        }
    }

    /// 有界重试：失败睡退避再试，退避逐次翻倍
    async fn deliver_with_retry(&self, event: &NotificationEvent) {
        let mut delay = self.retry_base;
        for attempt in 1..=self.max_attempts {
            match self.sink.deliver(event).await {
                Ok(()) => {
                    tracing::debug!(kind = event.kind(), attempt, "notification delivered");
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        kind = event.kind(),
                        attempt,
                        error = %e,
                        "notification delivery failed"
                    );
                    if attempt < self.max_attempts {
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                    }
                }
            }
        }
        tracing::error!(
            kind = event.kind(),
            attempts = self.max_attempts,
            "notification dropped after retries"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationService, SinkError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// 前 `failures` 次投递失败的 sink
    struct FlakySink {
        failures: AtomicU32,
        delivered: AtomicU32,
        attempts: AtomicU32,
    }

    impl FlakySink {
        fn failing_first(failures: u32) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                delivered: AtomicU32::new(0),
                attempts: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl NotificationSink for FlakySink {
        async fn deliver(&self, _event: &NotificationEvent) -> Result<(), SinkError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.failures.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |f| {
                if f > 0 { Some(f - 1) } else { None }
            }).is_ok()
            {
                return Err(SinkError("transport down".to_string()));
            }
            self.delivered.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_until_delivered() {
        let sink = Arc::new(FlakySink::failing_first(2));
        let worker = NotificationWorker::new(sink.clone(), 3, Duration::from_millis(100));
        let (service, rx) = NotificationService::channel(4);
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(worker.run(rx, shutdown));
        service.enqueue(NotificationEvent::BookingConfirmed {
            booking_id: "b1".to_string(),
        });
        drop(service);
        handle.await.unwrap();

        assert_eq!(sink.attempts.load(Ordering::SeqCst), 3);
        assert_eq!(sink.delivered.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_after_exhausted_retries() {
        let sink = Arc::new(FlakySink::failing_first(10));
        let worker = NotificationWorker::new(sink.clone(), 3, Duration::from_millis(100));
        let (service, rx) = NotificationService::channel(4);
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(worker.run(rx, shutdown));
        service.enqueue(NotificationEvent::BookingCancelled {
            booking_id: "b1".to_string(),
        });
        drop(service);
        handle.await.unwrap();

        // exactly max_attempts tries, nothing delivered
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 3);
        assert_eq!(sink.delivered.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shutdown_signal_stops_worker() {
        let sink = Arc::new(FlakySink::failing_first(0));
        let worker = NotificationWorker::new(sink, 3, Duration::from_millis(10));
        let (_service, rx) = NotificationService::channel(4);
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(worker.run(rx, shutdown.clone()));
        shutdown.cancel();
        handle.await.unwrap();
    }
}
