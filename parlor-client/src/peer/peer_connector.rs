use crate::peer::media::MediaTrack;
use crate::peer::peer_event::PeerEvent;
use anyhow::Result;
use async_trait::async_trait;
use parlor_core::{IceCandidate, SessionDescription};
use tokio::sync::mpsc;

/// One negotiable peer session. Offer/answer creation sets the local
/// description as a side effect, so callers never juggle the two separately.
#[async_trait]
pub trait PeerHandle: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_remote_description(&self, description: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn add_track(&self, track: MediaTrack) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Factory for negotiable peers. `event_tx` is the channel the peer pushes
/// its callbacks into; the owning session drains it in its own loop.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn connect(&self, event_tx: mpsc::Sender<PeerEvent>) -> Result<Box<dyn PeerHandle>>;
}
