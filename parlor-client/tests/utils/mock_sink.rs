use async_trait::async_trait;
use parlor_client::FrameSink;
use parlor_core::Frame;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Mock FrameSink that captures every outbound frame.
#[derive(Clone)]
pub struct MockFrameSink {
    /// Channel to stream captured frames to a waiting test.
    tx: mpsc::UnboundedSender<Frame>,
    /// All captured frames (for verification).
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl MockFrameSink {
    /// Create a new MockFrameSink and its receiver channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Frame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Self {
            tx,
            frames: Arc::new(Mutex::new(Vec::new())),
        };
        (sink, rx)
    }

    /// Get every captured frame whose subject starts with `prefix`.
    pub async fn frames_with_prefix(&self, prefix: &str) -> Vec<Frame> {
        self.frames
            .lock()
            .await
            .iter()
            .filter(|f| f.subject.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub async fn frames(&self) -> Vec<Frame> {
        self.frames.lock().await.clone()
    }
}

#[async_trait]
impl FrameSink for MockFrameSink {
    async fn send(&self, frame: Frame) {
        tracing::debug!("[MockSink] send {}", frame.subject);
        self.frames.lock().await.push(frame.clone());
        let _ = self.tx.send(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_core::{ParticipantId, RoomId, StreamKind};

    #[tokio::test]
    async fn test_mock_sink_captures_frames() {
        let (sink, mut rx) = MockFrameSink::new();
        let frame = Frame::stream(
            StreamKind::StopStream,
            RoomId::from("r1"),
            None,
            ParticipantId::from("alice"),
            "",
        )
        .unwrap();

        sink.send(frame).await;

        let captured = rx.recv().await.unwrap();
        assert_eq!(captured.subject, "stream.stop-stream.r1");
        assert_eq!(sink.frames_with_prefix("stream.").await.len(), 1);
    }
}
