use crate::peer::media::MediaTrack;
use parlor_core::IceCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceGatheringState {
    New,
    Gathering,
    Complete,
}

/// Asynchronous notifications a negotiable peer pushes into its owning
/// session's event loop. FIFO within one peer; arbitrary order across peers.
#[derive(Debug, Clone)]
pub enum PeerEvent {
    CandidateDiscovered(IceCandidate),
    TrackReceived(MediaTrack),
    ConnectionStateChanged(PeerConnectionState),
    GatheringStateChanged(IceGatheringState),
}
