mod message_repository_impl;
mod participant_repository_impl;

pub use message_repository_impl::PgMessageRepository;
pub use participant_repository_impl::PgParticipantRepository;

use domain::RepositoryError;

pub(crate) fn storage_error(err: sqlx::Error) -> RepositoryError {
    RepositoryError::storage(err.to_string())
}

/// 插入错误：唯一键冲突单独识别，其余归为存储错误。
pub(crate) fn insert_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict;
        }
    }
    storage_error(err)
}
