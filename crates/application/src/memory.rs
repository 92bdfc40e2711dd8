//! 内存 repository 实现，测试与无数据库的本地运行使用。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use domain::{Message, Participant, RepositoryError};

use crate::repository::{MessageRepository, ParticipantRepository};

#[derive(Default)]
pub struct MemoryParticipantRepository {
    rows: RwLock<Vec<Participant>>,
}

impl MemoryParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParticipantRepository for MemoryParticipantRepository {
    async fn create(&self, participant: Participant) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.name == participant.name) {
            return Err(RepositoryError::Conflict);
        }
        rows.push(participant);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Participant>, RepositoryError> {
        Ok(self.rows.read().await.clone())
    }

    async fn exists(&self, name: &str) -> Result<bool, RepositoryError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .any(|row| row.name.as_str() == name))
    }

    async fn touch(&self, name: &str, now: DateTime<Utc>) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|row| row.name.as_str() == name) {
            Some(row) => {
                row.heartbeat(now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, RepositoryError> {
        let mut rows = self.rows.write().await;
        let (stale, fresh): (Vec<_>, Vec<_>) = std::mem::take(&mut *rows)
            .into_iter()
            .partition(|row| row.is_stale(cutoff));
        *rows = fresh;
        Ok(stale
            .into_iter()
            .map(|row| row.name.into_string())
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryMessageRepository {
    rows: RwLock<Vec<Message>>,
}

impl MemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn append(&self, message: Message) -> Result<(), RepositoryError> {
        self.rows.write().await.push(message);
        Ok(())
    }

    async fn append_many(&self, messages: Vec<Message>) -> Result<(), RepositoryError> {
        self.rows.write().await.extend(messages);
        Ok(())
    }

    async fn visible_to(&self, requester: &str) -> Result<Vec<Message>, RepositoryError> {
        let rows = self.rows.read().await;
        let mut visible: Vec<Message> = rows
            .iter()
            .filter(|message| message.visible_to(requester))
            .cloned()
            .collect();
        // 稳定排序保留插入序作为次级键
        visible.sort_by(|a, b| a.sent_at.cmp(&b.sent_at));
        Ok(visible)
    }
}
