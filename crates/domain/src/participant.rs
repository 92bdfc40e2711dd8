use chrono::{DateTime, Utc};

use crate::value_objects::ParticipantName;

/// 注册在案的聊天参与者。
///
/// 生命周期：注册时创建，心跳时刷新 `last_seen_at`，
/// 过期后由 presence reaper 删除；没有显式的退出操作。
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub name: ParticipantName,
    pub last_seen_at: DateTime<Utc>,
}

impl Participant {
    pub fn register(name: ParticipantName, now: DateTime<Utc>) -> Self {
        Self {
            name,
            last_seen_at: now,
        }
    }

    /// 心跳只刷新时间戳，不改动其他字段。
    pub fn heartbeat(&mut self, now: DateTime<Utc>) {
        self.last_seen_at = now;
    }

    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_seen_at <= cutoff
    }
}
