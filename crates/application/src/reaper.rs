//! 在线状态清理任务
//!
//! 周期性删除心跳过期的参与者，并批量写入离开通知。

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use domain::{ClockTime, Message};

use crate::{
    clock::Clock,
    error::ApplicationError,
    repository::{MessageRepository, ParticipantRepository},
};

#[derive(Debug, Clone)]
pub struct ReaperSettings {
    /// 两次扫描之间的间隔
    pub period: Duration,
    /// 心跳超过该时长即视为离线
    pub idle_after: Duration,
}

impl Default for ReaperSettings {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(15),
            idle_after: Duration::from_secs(10),
        }
    }
}

pub struct PresenceReaper {
    participants: Arc<dyn ParticipantRepository>,
    messages: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
    settings: ReaperSettings,
}

impl PresenceReaper {
    pub fn new(
        participants: Arc<dyn ParticipantRepository>,
        messages: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
        settings: ReaperSettings,
    ) -> Self {
        Self {
            participants,
            messages,
            clock,
            settings,
        }
    }

    /// 执行一次扫描，返回本次驱逐的参与者数量。
    ///
    /// 删除与查找合并为存储的单条 delete-returning 语句，
    /// 赶在删除前落库的心跳会保住参与者。
    pub async fn sweep(&self) -> Result<usize, ApplicationError> {
        let now = self.clock.now();
        let cutoff = now - ChronoDuration::milliseconds(self.settings.idle_after.as_millis() as i64);

        let evicted = self.participants.delete_stale(cutoff).await?;
        if evicted.is_empty() {
            return Ok(0);
        }

        let sent_at = ClockTime::at(now);
        let notices = evicted
            .iter()
            .map(|name| Message::left(name, sent_at.clone()))
            .collect();
        self.messages.append_many(notices).await?;

        tracing::info!(count = evicted.len(), "evicted idle participants");
        Ok(evicted.len())
    }

    /// 以固定周期在后台运行；失败只记日志，节奏不变。
    pub fn spawn(self) -> ReaperHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.settings.period);
            // interval 的首个 tick 立即触发，先消费掉让首次扫描等满一个周期
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        if let Err(err) = self.sweep().await {
                            tracing::warn!(error = %err, "presence sweep failed");
                        }
                    }
                }
            }
            tracing::info!("presence reaper stopped");
        });
        ReaperHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

/// 后台任务的句柄，关停进程时先停掉清理任务。
pub struct ReaperHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}
