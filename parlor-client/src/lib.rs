pub mod api;
pub mod call;
pub mod channel;
pub mod chat;
pub mod peer;
pub mod router;
pub mod session;
pub mod stream;

pub use api::{HttpRoomApi, RemoteHolder, RoomApi};
pub use call::{CallCommand, CallHandle, CallPhase, CallSession, CallStatus};
pub use channel::{ChannelStatus, FrameSink, SignalingChannel};
pub use chat::ChatStream;
pub use peer::{
    IceGatheringState, MediaGateway, MediaSource, MediaTrack, PeerConnectionState, PeerConnector,
    PeerEvent, PeerHandle, TrackKind,
};
pub use router::SubjectRouter;
pub use session::{RoomSession, SessionConfig, SessionContext};
pub use stream::{StreamCommand, StreamHandle, StreamSession, StreamState, StreamStatus};
