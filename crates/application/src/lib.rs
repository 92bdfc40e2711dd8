//! 应用层：repository 抽象、服务编排与后台清理任务。

pub mod clock;
pub mod dto;
pub mod error;
pub mod memory;
pub mod reaper;
pub mod repository;
pub mod services;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dto::{MessageDto, ParticipantDto};
pub use error::ApplicationError;
pub use reaper::{PresenceReaper, ReaperHandle, ReaperSettings};
pub use repository::{MessageRepository, ParticipantRepository};
pub use services::{
    MessageService, MessageServiceDependencies, ParticipantService,
    ParticipantServiceDependencies, PostMessageRequest,
};
