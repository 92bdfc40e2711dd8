use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domain::{Message, MessageKind, Participant};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub name: String,
    pub last_seen_at: DateTime<Utc>,
}

impl From<&Participant> for ParticipantDto {
    fn from(participant: &Participant) -> Self {
        Self {
            name: participant.name.as_str().to_string(),
            last_seen_at: participant.last_seen_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub sent_at: String,
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            from: message.from.clone(),
            to: message.to.clone(),
            text: message.text.clone(),
            kind: message.kind,
            sent_at: message.sent_at.as_str().to_string(),
        }
    }
}
