//! 消息 repository 的 PostgreSQL 实现

use async_trait::async_trait;
use sqlx::{FromRow, QueryBuilder};

use application::MessageRepository;
use domain::{ClockTime, Message, MessageKind, RepositoryError};

use super::storage_error;
use crate::db::DbPool;

#[derive(Debug, FromRow)]
struct DbMessage {
    sender: String,
    recipient: String,
    body: String,
    kind: String,
    sent_at: String,
}

fn hydrate(row: DbMessage) -> Result<Message, RepositoryError> {
    let kind = row
        .kind
        .parse::<MessageKind>()
        .map_err(|err| RepositoryError::storage(format!("corrupt message row: {err}")))?;
    Ok(Message {
        from: row.sender,
        to: row.recipient,
        text: row.body,
        kind,
        sent_at: ClockTime::from_raw(row.sent_at),
    })
}

pub struct PgMessageRepository {
    pool: DbPool,
}

impl PgMessageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn append(&self, message: Message) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO messages (sender, recipient, body, kind, sent_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&message.from)
        .bind(&message.to)
        .bind(&message.text)
        .bind(message.kind.as_str())
        .bind(message.sent_at.as_str())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(())
    }

    async fn append_many(&self, messages: Vec<Message>) -> Result<(), RepositoryError> {
        if messages.is_empty() {
            return Ok(());
        }
        let mut builder = QueryBuilder::<sqlx::Postgres>::new(
            "INSERT INTO messages (sender, recipient, body, kind, sent_at) ",
        );
        builder.push_values(messages.iter(), |mut row, message| {
            row.push_bind(&message.from)
                .push_bind(&message.to)
                .push_bind(&message.text)
                .push_bind(message.kind.as_str())
                .push_bind(message.sent_at.as_str());
        });
        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn visible_to(&self, requester: &str) -> Result<Vec<Message>, RepositoryError> {
        // 文本时间字典序排序，id 兜底同秒内的插入序
        let rows = sqlx::query_as::<_, DbMessage>(
            "SELECT sender, recipient, body, kind, sent_at FROM messages \
             WHERE kind IN ('message', 'status') \
                OR (kind = 'private_message' AND (recipient = $1 OR sender = $1)) \
             ORDER BY sent_at ASC, id ASC",
        )
        .bind(requester)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;
        rows.into_iter().map(hydrate).collect()
    }
}
