mod chat;
mod frame;
mod participant;
mod room;
mod signaling;
mod subject;

pub use chat::{ChatMessage, ChatPayload};
pub use frame::{Frame, FrameError};
pub use participant::ParticipantId;
pub use room::RoomId;
pub use signaling::{IceCandidate, IceServerConfig, SdpType, SessionDescription};
pub use subject::{StreamKind, Subject, SubjectError, WebrtcKind};
