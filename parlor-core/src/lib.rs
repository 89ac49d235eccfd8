pub mod model;

pub use model::{
    ChatMessage, ChatPayload, Frame, FrameError, IceCandidate, IceServerConfig, ParticipantId,
    RoomId, SdpType, SessionDescription, StreamKind, Subject, SubjectError, WebrtcKind,
};
