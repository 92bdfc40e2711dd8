use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// 广播哨兵收件人，表示"所有人"。
///
/// 保留值，不允许注册同名参与者。
pub const BROADCAST_TARGET: &str = "Todos";

/// 经过校验的参与者名字。
///
/// 非空（去除首尾空白后）、区分大小写、且不得与广播哨兵重名。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantName(String);

impl ParticipantName {
    pub fn parse(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_input("name", "must not be empty"));
        }
        if trimmed == BROADCAST_TARGET {
            return Err(DomainError::invalid_input(
                "name",
                format!("`{BROADCAST_TARGET}` is reserved for broadcast"),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 消息发送时刻，`HH:MM:SS` 文本（UTC）。
///
/// 历史接口按该文本做字典序排序；零填充保证同一天内与时钟序一致。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockTime(String);

impl ClockTime {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant.format("%H:%M:%S").to_string())
    }

    /// 从存储行原样恢复，不再校验格式。
    pub fn from_raw(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 消息类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// 公开消息，所有人可见
    Message,
    /// 私信，仅发送者与收件人可见
    PrivateMessage,
    /// 系统生成的进出通知，视为公开
    Status,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::PrivateMessage => "private_message",
            Self::Status => "status",
        }
    }

    /// 参与者可以主动发送的类型；`status` 只能由系统生成。
    pub fn parse_postable(raw: &str) -> DomainResult<Self> {
        match raw.parse::<Self>() {
            Ok(Self::Status) | Err(_) => Err(DomainError::invalid_input(
                "type",
                "must be `message` or `private_message`",
            )),
            Ok(kind) => Ok(kind),
        }
    }
}

impl FromStr for MessageKind {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "message" => Ok(Self::Message),
            "private_message" => Ok(Self::PrivateMessage),
            "status" => Ok(Self::Status),
            other => Err(DomainError::invalid_input(
                "type",
                format!("unknown message type `{other}`"),
            )),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
