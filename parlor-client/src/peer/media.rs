use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

/// Handle to one media track. The actual capture/render machinery lives in
/// the embedder; sessions only move these handles around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTrack {
    pub id: String,
    pub kind: TrackKind,
}

/// A camera/microphone capture owned by the local participant.
#[derive(Debug, Clone)]
pub struct MediaSource {
    pub tracks: Vec<MediaTrack>,
}

/// Device acquisition, consumed as an opaque capability. `acquire` returns
/// `None` when no capture device is available, which aborts the negotiation
/// step that asked for it.
#[async_trait]
pub trait MediaGateway: Send + Sync {
    async fn acquire(&self) -> Option<MediaSource>;

    /// Stop every track of a previously acquired source.
    async fn release(&self, source: MediaSource);
}
