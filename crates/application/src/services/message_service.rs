use std::sync::Arc;

use domain::{ClockTime, DomainError, Message, MessageKind};

use crate::{
    clock::Clock,
    dto::MessageDto,
    error::ApplicationError,
    repository::{MessageRepository, ParticipantRepository},
};

#[derive(Debug, Clone)]
pub struct PostMessageRequest {
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: String,
}

pub struct MessageServiceDependencies {
    pub participants: Arc<dyn ParticipantRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct MessageService {
    deps: MessageServiceDependencies,
}

impl MessageService {
    pub fn new(deps: MessageServiceDependencies) -> Self {
        Self { deps }
    }

    /// 校验并写入一条消息。未注册的发送者同样算非法输入。
    pub async fn post(&self, request: PostMessageRequest) -> Result<MessageDto, ApplicationError> {
        let kind = MessageKind::parse_postable(&request.kind)?;
        let sent_at = ClockTime::at(self.deps.clock.now());
        let message = Message::chat(&request.from, request.to, request.text, kind, sent_at)?;

        if !self.deps.participants.exists(&request.from).await? {
            return Err(DomainError::invalid_input(
                "user",
                "sender is not a registered participant",
            )
            .into());
        }

        self.deps.messages.append(message.clone()).await?;
        Ok(MessageDto::from(&message))
    }

    /// 请求者可见的历史，升序；`limit` 为正且小于结果数时取末尾 `limit` 条。
    ///
    /// 非正数或无法解析的 limit 视同缺省，返回全量（与原系统的宽松解析一致）。
    pub async fn history(
        &self,
        requester: &str,
        limit: Option<i64>,
    ) -> Result<Vec<MessageDto>, ApplicationError> {
        let messages = self.deps.messages.visible_to(requester).await?;
        let mut dtos: Vec<MessageDto> = messages.iter().map(MessageDto::from).collect();

        let keep = match limit {
            Some(n) if n > 0 && (n as usize) < dtos.len() => n as usize,
            _ => dtos.len(),
        };
        Ok(dtos.split_off(dtos.len() - keep))
    }
}
