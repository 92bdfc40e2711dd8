use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{ClockTime, MessageKind, BROADCAST_TARGET};

/// 进入房间的系统通知文案。
pub const JOIN_NOTICE: &str = "entra na sala...";
/// 离开房间的系统通知文案。
pub const LEAVE_NOTICE: &str = "sai da sala...";

/// 一条聊天消息。写入后不可变。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
    pub sent_at: ClockTime,
}

impl Message {
    /// 参与者主动发送的消息。`status` 类型走 [`Message::joined`] / [`Message::left`]。
    pub fn chat(
        from: &str,
        to: impl Into<String>,
        text: impl Into<String>,
        kind: MessageKind,
        sent_at: ClockTime,
    ) -> DomainResult<Self> {
        let to = to.into();
        let text = text.into();
        if to.trim().is_empty() {
            return Err(DomainError::invalid_input("to", "must not be empty"));
        }
        if text.trim().is_empty() {
            return Err(DomainError::invalid_input("text", "must not be empty"));
        }
        if kind == MessageKind::Status {
            return Err(DomainError::invalid_input(
                "type",
                "status messages are system-generated",
            ));
        }
        Ok(Self {
            from: from.to_string(),
            to,
            text,
            kind,
            sent_at,
        })
    }

    /// 进入房间的公开通知。
    pub fn joined(name: &str, sent_at: ClockTime) -> Self {
        Self {
            from: name.to_string(),
            to: BROADCAST_TARGET.to_string(),
            text: JOIN_NOTICE.to_string(),
            kind: MessageKind::Status,
            sent_at,
        }
    }

    /// 离开房间的公开通知。
    pub fn left(name: &str, sent_at: ClockTime) -> Self {
        Self {
            from: name.to_string(),
            to: BROADCAST_TARGET.to_string(),
            text: LEAVE_NOTICE.to_string(),
            kind: MessageKind::Status,
            sent_at,
        }
    }

    /// 历史接口的可见性规则：公开消息与系统通知对所有人可见，
    /// 私信只对发送者与收件人可见。
    pub fn visible_to(&self, requester: &str) -> bool {
        match self.kind {
            MessageKind::Message | MessageKind::Status => true,
            MessageKind::PrivateMessage => self.from == requester || self.to == requester,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> ClockTime {
        ClockTime::from_raw(raw.to_string())
    }

    #[test]
    fn chat_rejects_empty_recipient_and_text() {
        let err = Message::chat("Ana", "", "oi", MessageKind::Message, at("10:00:00"));
        assert!(matches!(
            err.unwrap_err(),
            DomainError::InvalidInput { field: "to", .. }
        ));

        let err = Message::chat("Ana", "Bob", "  ", MessageKind::Message, at("10:00:00"));
        assert!(matches!(
            err.unwrap_err(),
            DomainError::InvalidInput { field: "text", .. }
        ));
    }

    #[test]
    fn chat_rejects_status_kind() {
        let err = Message::chat("Ana", "Todos", "oi", MessageKind::Status, at("10:00:00"));
        assert!(matches!(
            err.unwrap_err(),
            DomainError::InvalidInput { field: "type", .. }
        ));
    }

    #[test]
    fn notices_are_public_broadcasts() {
        let joined = Message::joined("Ana", at("10:00:00"));
        assert_eq!(joined.to, BROADCAST_TARGET);
        assert_eq!(joined.text, JOIN_NOTICE);
        assert_eq!(joined.kind, MessageKind::Status);

        let left = Message::left("Ana", at("10:00:01"));
        assert_eq!(left.text, LEAVE_NOTICE);
        assert!(left.visible_to("Carol"));
    }

    #[test]
    fn private_messages_visible_to_both_ends_only() {
        let message = Message::chat(
            "Ana",
            "Bob",
            "segredo",
            MessageKind::PrivateMessage,
            at("10:00:00"),
        )
        .unwrap();

        assert!(message.visible_to("Ana"));
        assert!(message.visible_to("Bob"));
        assert!(!message.visible_to("Carol"));
    }

    #[test]
    fn public_messages_visible_to_everyone() {
        let message =
            Message::chat("Ana", "Todos", "oi", MessageKind::Message, at("10:00:00")).unwrap();
        assert!(message.visible_to("Carol"));
    }
}
