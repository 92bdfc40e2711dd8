use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Message, Participant, RepositoryError};

#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// 插入新参与者；名字已存在时返回 [`RepositoryError::Conflict`]。
    /// 实现必须依赖存储的原子 insert-if-absent 原语，不得先查后插。
    async fn create(&self, participant: Participant) -> Result<(), RepositoryError>;

    /// 全量返回，存储自然序，不保证排序。
    async fn list(&self) -> Result<Vec<Participant>, RepositoryError>;

    async fn exists(&self, name: &str) -> Result<bool, RepositoryError>;

    /// 刷新心跳时间戳；返回是否命中现有参与者。
    async fn touch(&self, name: &str, now: DateTime<Utc>) -> Result<bool, RepositoryError>;

    /// 原子地删除所有 `last_seen_at <= cutoff` 的参与者并返回其名字。
    /// 单条语句完成查找与删除，避免与并发心跳竞态。
    async fn delete_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, RepositoryError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn append(&self, message: Message) -> Result<(), RepositoryError>;

    /// 单次多行插入，用于批量写入离开通知。
    async fn append_many(&self, messages: Vec<Message>) -> Result<(), RepositoryError>;

    /// 请求者可见的消息：公开消息、系统通知，以及收发双方包含请求者的私信。
    /// 按 `sent_at` 文本升序返回，插入序为次级排序键。
    async fn visible_to(&self, requester: &str) -> Result<Vec<Message>, RepositoryError>;
}
