use crate::model::participant::ParticipantId;
use crate::model::room::RoomId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of a `chat.<room>` frame. The sender id travels in the frame
/// envelope, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPayload {
    pub id: Uuid,
    pub sender_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// One entry in the local chat history, newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub chatroom_id: RoomId,
    pub sender: ParticipantId,
    pub sender_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// A freshly authored message, minted locally before it hits the wire.
    pub fn new(
        room: RoomId,
        sender: ParticipantId,
        sender_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            chatroom_id: room,
            sender,
            sender_name: sender_name.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn from_payload(room: RoomId, sender: ParticipantId, payload: ChatPayload) -> Self {
        Self {
            id: payload.id,
            chatroom_id: room,
            sender,
            sender_name: payload.sender_name,
            content: payload.content,
            created_at: payload.created_at,
        }
    }

    pub fn payload(&self) -> ChatPayload {
        ChatPayload {
            id: self.id,
            sender_name: self.sender_name.clone(),
            content: self.content.clone(),
            created_at: self.created_at,
        }
    }
}
