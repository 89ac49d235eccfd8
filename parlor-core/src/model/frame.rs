use crate::model::chat::ChatPayload;
use crate::model::participant::ParticipantId;
use crate::model::room::RoomId;
use crate::model::subject::{StreamKind, Subject, SubjectError, WebrtcKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("bad subject: {0}")]
    Subject(#[from] SubjectError),
    #[error("bad payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// The unit exchanged over the signaling channel. The payload stays opaque
/// JSON until the sub-protocol selected by the subject interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub subject: String,
    pub sender: ParticipantId,
    pub payload: Value,
}

impl Frame {
    pub fn new(
        subject: &Subject,
        sender: ParticipantId,
        payload: impl Serialize,
    ) -> Result<Self, FrameError> {
        Ok(Self {
            subject: subject.to_string(),
            sender,
            payload: serde_json::to_value(payload)?,
        })
    }

    pub fn chat(
        room: RoomId,
        sender: ParticipantId,
        payload: &ChatPayload,
    ) -> Result<Self, FrameError> {
        Frame::new(&Subject::Chat { room }, sender, payload)
    }

    pub fn webrtc(
        kind: WebrtcKind,
        room: RoomId,
        sender: ParticipantId,
        payload: impl Serialize,
    ) -> Result<Self, FrameError> {
        Frame::new(&Subject::Webrtc { kind, room }, sender, payload)
    }

    pub fn stream(
        kind: StreamKind,
        room: RoomId,
        participant: Option<ParticipantId>,
        sender: ParticipantId,
        payload: impl Serialize,
    ) -> Result<Self, FrameError> {
        Frame::new(
            &Subject::Stream {
                kind,
                room,
                participant,
            },
            sender,
            payload,
        )
    }

    /// Parse the routing key. Fails on malformed or unknown-domain subjects;
    /// callers drop such frames rather than treating them as fatal.
    pub fn subject(&self) -> Result<Subject, SubjectError> {
        self.subject.parse()
    }

    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, FrameError> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}
