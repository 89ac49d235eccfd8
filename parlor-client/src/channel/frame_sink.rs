use async_trait::async_trait;
use parlor_core::Frame;

/// Outbound half of the signaling channel as the sessions see it.
///
/// Sends are fire-and-forget: a frame that cannot be delivered is logged and
/// dropped, never retried. Chat, call and stream sends interleave freely
/// because every frame carries its own subject.
#[async_trait]
pub trait FrameSink: Send + Sync {
    async fn send(&self, frame: Frame);
}
