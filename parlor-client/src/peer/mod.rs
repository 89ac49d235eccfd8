mod media;
mod peer_connector;
mod peer_event;

pub use media::{MediaGateway, MediaSource, MediaTrack, TrackKind};
pub use peer_connector::{PeerConnector, PeerHandle};
pub use peer_event::{IceGatheringState, PeerConnectionState, PeerEvent};
