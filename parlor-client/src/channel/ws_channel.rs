use crate::channel::FrameSink;
use crate::router::SubjectRouter;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parlor_core::{Frame, RoomId};
use std::sync::{Arc, Mutex};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    Open,
    Closed,
}

struct ChannelSink {
    out_tx: mpsc::UnboundedSender<Frame>,
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn send(&self, frame: Frame) {
        if self.out_tx.send(frame).is_err() {
            warn!("Dropping outbound frame: channel is closed");
        }
    }
}

/// The single persistent connection of one `(participant, room)` visit.
///
/// A send task drains the outbound queue onto the socket; a receive task
/// parses inbound JSON frames and hands them to the subject router. Either
/// side finishing flips the status to `Closed`; the owner observes that and
/// decides whether to rejoin (which starts every state machine over).
pub struct SignalingChannel {
    out_tx: mpsc::UnboundedSender<Frame>,
    status_tx: watch::Sender<ChannelStatus>,
    status_rx: watch::Receiver<ChannelStatus>,
    reader: Mutex<Option<WsReader>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SignalingChannel {
    /// Open the socket for `room`. The receive loop does not start until
    /// `spawn_receive` installs a router, so sessions can be wired up against
    /// `sink()` first without racing inbound frames.
    pub async fn connect(ws_url: &str, room: &RoomId) -> Result<Self> {
        let url = format!("{ws_url}?cid={room}");
        let (socket, _) = tokio_tungstenite::connect_async(&url)
            .await
            .with_context(|| format!("Failed to connect signaling channel to {url}"))?;
        info!("Signaling channel connected for room {}", room);

        let (writer, reader) = socket.split();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(ChannelStatus::Open);

        tokio::spawn(Self::send_loop(
            writer,
            out_rx,
            status_tx.clone(),
            status_rx.clone(),
        ));

        Ok(Self {
            out_tx,
            status_tx,
            status_rx,
            reader: Mutex::new(Some(reader)),
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn sink(&self) -> Arc<dyn FrameSink> {
        Arc::new(ChannelSink {
            out_tx: self.out_tx.clone(),
        })
    }

    pub fn status(&self) -> watch::Receiver<ChannelStatus> {
        self.status_rx.clone()
    }

    /// Start delivering inbound frames into `router`. No-op when called twice.
    pub fn spawn_receive(&self, router: SubjectRouter) {
        let mut slot = self.reader.lock().unwrap_or_else(|e| e.into_inner());
        let Some(reader) = slot.take() else {
            warn!("Receive loop already running");
            return;
        };
        drop(slot);
        let status_tx = self.status_tx.clone();
        let task = tokio::spawn(Self::receive_loop(reader, router, status_tx));
        self.tasks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(task);
    }

    /// Tear the connection down. The receive task is aborted; the send task
    /// observes the status flip, flushes frames already queued, and closes
    /// the socket. Idempotent: closing an already-closed channel only
    /// re-publishes `Closed`.
    pub fn close(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        for task in tasks.drain(..) {
            task.abort();
        }
        self.status_tx.send_replace(ChannelStatus::Closed);
    }

    async fn send_loop(
        mut writer: WsWriter,
        mut out_rx: mpsc::UnboundedReceiver<Frame>,
        status_tx: watch::Sender<ChannelStatus>,
        mut status_rx: watch::Receiver<ChannelStatus>,
    ) {
        loop {
            tokio::select! {
                frame = out_rx.recv() => match frame {
                    Some(frame) => {
                        if !Self::write_frame(&mut writer, frame).await {
                            status_tx.send_replace(ChannelStatus::Closed);
                            return;
                        }
                    }
                    None => break,
                },

                changed = status_rx.changed() => {
                    if changed.is_err() || *status_rx.borrow() == ChannelStatus::Closed {
                        break;
                    }
                }
            }
        }

        // Frames enqueued before the close was observed still go out.
        while let Ok(frame) = out_rx.try_recv() {
            if !Self::write_frame(&mut writer, frame).await {
                break;
            }
        }
        let _ = writer.close().await;
        status_tx.send_replace(ChannelStatus::Closed);
    }

    async fn write_frame(writer: &mut WsWriter, frame: Frame) -> bool {
        let json = match serde_json::to_string(&frame) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize outbound frame: {}", e);
                return true;
            }
        };
        if let Err(e) = writer.send(Message::text(json)).await {
            warn!("Signaling send failed, closing channel: {}", e);
            return false;
        }
        true
    }

    async fn receive_loop(
        mut reader: WsReader,
        router: SubjectRouter,
        status_tx: watch::Sender<ChannelStatus>,
    ) {
        while let Some(message) = reader.next().await {
            match message {
                Ok(Message::Text(text)) => match serde_json::from_str::<Frame>(text.as_str()) {
                    Ok(frame) => router.route(frame).await,
                    Err(e) => warn!("Discarding unparseable frame: {}", e),
                },
                Ok(Message::Close(_)) => {
                    info!("Signaling channel closed by server");
                    break;
                }
                Ok(other) => debug!("Ignoring non-text signaling message: {:?}", other),
                Err(e) => {
                    warn!("Signaling receive failed: {}", e);
                    break;
                }
            }
        }
        status_tx.send_replace(ChannelStatus::Closed);
    }
}

impl Drop for SignalingChannel {
    fn drop(&mut self) {
        self.close();
    }
}
