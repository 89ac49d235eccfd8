use crate::channel::FrameSink;
use crate::session::SessionContext;
use anyhow::Result;
use parlor_core::{ChatMessage, ChatPayload, Frame};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Ordered, deduplicated local chat history plus the send path.
///
/// Sends are optimistic: the message enters the history before the frame is
/// written, and the broker's echo of our own frame is suppressed on receive,
/// so each logical message is inserted exactly once. Chat is best-effort; a
/// dropped frame leaves the optimistic copy as the only record.
#[derive(Clone)]
pub struct ChatStream {
    ctx: SessionContext,
    sink: Arc<dyn FrameSink>,
    history: Arc<Mutex<Vec<ChatMessage>>>,
}

impl ChatStream {
    pub fn new(ctx: SessionContext, sink: Arc<dyn FrameSink>) -> Self {
        Self {
            ctx,
            sink,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Author a message: insert at the head of the history, then transmit.
    pub async fn send(&self, content: impl Into<String>) -> Result<ChatMessage> {
        let message = ChatMessage::new(
            self.ctx.room.clone(),
            self.ctx.participant.clone(),
            self.ctx.display_name.clone(),
            content,
        );

        self.history.lock().await.insert(0, message.clone());

        let frame = Frame::chat(
            self.ctx.room.clone(),
            self.ctx.participant.clone(),
            &message.payload(),
        )?;
        self.sink.send(frame).await;

        Ok(message)
    }

    /// Inbound `chat.<room>` frame, already room-checked by the router.
    pub async fn on_remote(&self, frame: Frame) {
        if frame.sender == self.ctx.participant {
            debug!("Suppressing echo of own chat message");
            return;
        }

        let payload: ChatPayload = match frame.payload_as() {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Discarding chat frame with bad payload: {}", e);
                return;
            }
        };

        let message = ChatMessage::from_payload(self.ctx.room.clone(), frame.sender, payload);
        self.history.lock().await.insert(0, message);
    }

    /// Newest-first snapshot for the rendering layer.
    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.lock().await.clone()
    }
}
