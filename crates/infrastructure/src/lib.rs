//! 基础设施层：PostgreSQL repository 实现与连接池。

pub mod db;

pub use db::repositories::{PgMessageRepository, PgParticipantRepository};
pub use db::{create_pg_pool, DbPool};

/// 内嵌迁移，启动时由二进制执行。
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
