use std::sync::Arc;

use domain::{ClockTime, DomainError, Message, Participant, ParticipantName, RepositoryError};

use crate::{
    clock::Clock,
    dto::ParticipantDto,
    error::ApplicationError,
    repository::{MessageRepository, ParticipantRepository},
};

pub struct ParticipantServiceDependencies {
    pub participants: Arc<dyn ParticipantRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct ParticipantService {
    deps: ParticipantServiceDependencies,
}

impl ParticipantService {
    pub fn new(deps: ParticipantServiceDependencies) -> Self {
        Self { deps }
    }

    /// 注册参与者并广播进入通知。
    ///
    /// 唯一性由存储的插入冲突判定；两次写入不在同一事务里，
    /// 通知写入失败会留下没有进入通知的参与者（与原系统一致）。
    pub async fn register(&self, raw_name: String) -> Result<ParticipantDto, ApplicationError> {
        let name = ParticipantName::parse(raw_name)?;
        let now = self.deps.clock.now();
        let participant = Participant::register(name.clone(), now);

        match self.deps.participants.create(participant.clone()).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict) => {
                return Err(DomainError::ParticipantExists.into());
            }
            Err(err) => return Err(err.into()),
        }

        self.deps
            .messages
            .append(Message::joined(name.as_str(), ClockTime::at(now)))
            .await?;

        tracing::info!(name = %name, "participant registered");
        Ok(ParticipantDto::from(&participant))
    }

    pub async fn list(&self) -> Result<Vec<ParticipantDto>, ApplicationError> {
        let participants = self.deps.participants.list().await?;
        Ok(participants.iter().map(ParticipantDto::from).collect())
    }

    /// 刷新心跳；未知名字（包括缺失的 user 头）映射为 NotFound。
    pub async fn heartbeat(&self, name: &str) -> Result<(), ApplicationError> {
        let now = self.deps.clock.now();
        if self.deps.participants.touch(name, now).await? {
            Ok(())
        } else {
            Err(DomainError::ParticipantNotFound.into())
        }
    }
}
