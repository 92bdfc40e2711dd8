//! 参与者 repository 的 PostgreSQL 实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use application::ParticipantRepository;
use domain::{Participant, ParticipantName, RepositoryError};

use super::{insert_error, storage_error};
use crate::db::DbPool;

#[derive(Debug, FromRow)]
struct DbParticipant {
    name: String,
    last_seen_at: DateTime<Utc>,
}

fn hydrate(row: DbParticipant) -> Result<Participant, RepositoryError> {
    let name = ParticipantName::parse(row.name)
        .map_err(|err| RepositoryError::storage(format!("corrupt participant row: {err}")))?;
    Ok(Participant {
        name,
        last_seen_at: row.last_seen_at,
    })
}

pub struct PgParticipantRepository {
    pool: DbPool,
}

impl PgParticipantRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PgParticipantRepository {
    async fn create(&self, participant: Participant) -> Result<(), RepositoryError> {
        // 唯一性由主键保证，冲突映射为 Conflict
        sqlx::query("INSERT INTO participants (name, last_seen_at) VALUES ($1, $2)")
            .bind(participant.name.as_str())
            .bind(participant.last_seen_at)
            .execute(&self.pool)
            .await
            .map_err(insert_error)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Participant>, RepositoryError> {
        let rows =
            sqlx::query_as::<_, DbParticipant>("SELECT name, last_seen_at FROM participants")
                .fetch_all(&self.pool)
                .await
                .map_err(storage_error)?;
        rows.into_iter().map(hydrate).collect()
    }

    async fn exists(&self, name: &str) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM participants WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn touch(&self, name: &str, now: DateTime<Utc>) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE participants SET last_seen_at = $2 WHERE name = $1")
            .bind(name)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, RepositoryError> {
        // 查找与删除合并成单条语句，避免与并发心跳竞态
        sqlx::query_scalar::<_, String>(
            "DELETE FROM participants WHERE last_seen_at <= $1 RETURNING name",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)
    }
}
