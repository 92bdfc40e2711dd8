//! 聊天室核心领域模型
//!
//! 包含参与者、消息两个实体，以及校验规则和错误类型。

pub mod errors;
pub mod message;
pub mod participant;
pub mod value_objects;

pub use errors::{DomainError, DomainResult, RepositoryError};
pub use message::{Message, JOIN_NOTICE, LEAVE_NOTICE};
pub use participant::Participant;
pub use value_objects::{ClockTime, MessageKind, ParticipantName, BROADCAST_TARGET};
