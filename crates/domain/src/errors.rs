//! 领域错误定义

use thiserror::Error;

/// 业务规则错误，在任何写入之前同步检出。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 请求字段缺失或不合法
    #[error("invalid input: {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// 参与者名字已被占用
    #[error("participant already exists")]
    ParticipantExists,

    /// 引用的参与者不存在
    #[error("participant not found")]
    ParticipantNotFound,
}

impl DomainError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// 领域结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 存储层错误，由 repository 实现上抛。
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 唯一键冲突
    #[error("resource already exists")]
    Conflict,

    /// 目标行不存在
    #[error("resource not found")]
    NotFound,

    /// 底层存储失败，细节只进日志
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
