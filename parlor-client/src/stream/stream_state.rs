use crate::peer::{MediaTrack, PeerHandle};
use parlor_core::IceCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Observable snapshot of the stream viewer; `Connected` with tracks means
/// the waiting indicator goes away and the tracks go to the visible output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamStatus {
    pub state: StreamState,
    pub tracks: Vec<MediaTrack>,
}

/// Resources of one stream viewing, created when the server's offer arrives.
pub(crate) struct StreamLeg {
    pub peer: Box<dyn PeerHandle>,
    pub received_tracks: Vec<MediaTrack>,
    /// Local candidates held until ICE gathering completes; the offering side
    /// is a long-lived server process, so they are flushed as one batch.
    pub deferred: Vec<IceCandidate>,
    pub gathering_complete: bool,
}

impl StreamLeg {
    pub fn new(peer: Box<dyn PeerHandle>) -> Self {
        Self {
            peer,
            received_tracks: Vec::new(),
            deferred: Vec::new(),
            gathering_complete: false,
        }
    }
}
