//! Notification queue - 通知队列
//!
//! 准入决策提交后的通知走 fire-and-forget 队列：入队失败只告警，
//! 绝不影响已提交的预订。投递 (email/SMS) 是下游传输的事，引擎只
//! 面向 [`NotificationSink`] trait，自带一个 tracing 落日志的实现。
//!
//! handle/worker 成对使用：`NotificationService` 是可克隆的发送端，
//! [`NotificationWorker`] 在后台消费并带退避重试。

pub mod worker;

pub use worker::NotificationWorker;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use shared::models::NotificationEvent;

/// Delivery failure reported by a sink
#[derive(Debug, Error)]
#[error("Delivery failed: {0}")]
pub struct SinkError(pub String);

/// 下游投递接口
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), SinkError>;
}

/// tracing 落日志的 sink — 无外部传输时的缺省实现
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), SinkError> {
        let payload = serde_json::to_string(event).map_err(|e| SinkError(e.to_string()))?;
        tracing::info!(
            target: "notifications",
            kind = event.kind(),
            payload = %payload,
            "notification delivered"
        );
        Ok(())
    }
}

/// 通知入队 handle
///
/// `enqueue` 非阻塞：准入路径绝不等待通知队列。队列满或已关闭时
/// 事件丢弃并告警 (下游按 at-least-once 自行兜底)。
#[derive(Clone)]
pub struct NotificationService {
    tx: mpsc::Sender<NotificationEvent>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

impl NotificationService {
    /// 创建 handle + 消费端，receiver 交给 [`NotificationWorker::run`]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<NotificationEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Fire-and-forget 入队
    pub fn enqueue(&self, event: NotificationEvent) {
        let kind = event.kind();
        match self.tx.try_send(event) {
            Ok(()) => tracing::debug!(kind, "notification queued"),
            Err(e) => tracing::warn!(kind, error = %e, "notification queue unavailable, event dropped"),
        }
    }
}
