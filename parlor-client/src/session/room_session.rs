use crate::api::{HttpRoomApi, RemoteHolder, RoomApi};
use crate::call::{CallHandle, CallPhase, CallSession};
use crate::channel::{ChannelStatus, SignalingChannel};
use crate::chat::ChatStream;
use crate::peer::{MediaGateway, PeerConnector};
use crate::router::SubjectRouter;
use crate::session::SessionContext;
use crate::stream::{StreamHandle, StreamSession, StreamState};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// How long `leave` waits for the session actors to confirm teardown before
/// closing the channel anyway.
const LEAVE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Signaling endpoint; the room id is appended as `?cid=`.
    pub ws_url: String,
    /// REST base for the remote-holder and stream-provisioning calls.
    pub api_url: String,
}

/// One visit to one chatroom: the channel, the chat history and both peer
/// session actors, wired together at join time and torn down together.
///
/// Joining a different room requires leaving first, so a stale room's frames
/// can never reach a new room's sessions.
pub struct RoomSession {
    ctx: SessionContext,
    chat: ChatStream,
    call: CallHandle,
    stream: StreamHandle,
    channel: SignalingChannel,
    api: Arc<dyn RoomApi>,
}

impl RoomSession {
    pub async fn join(
        config: &SessionConfig,
        ctx: SessionContext,
        connector: Arc<dyn PeerConnector>,
        media: Arc<dyn MediaGateway>,
    ) -> Result<Self> {
        let api: Arc<dyn RoomApi> = Arc::new(HttpRoomApi::new(config.api_url.clone()));
        Self::join_with(&config.ws_url, ctx, connector, media, api).await
    }

    /// Join with an explicit API collaborator (tests inject a mock here).
    pub async fn join_with(
        ws_url: &str,
        ctx: SessionContext,
        connector: Arc<dyn PeerConnector>,
        media: Arc<dyn MediaGateway>,
        api: Arc<dyn RoomApi>,
    ) -> Result<Self> {
        let channel = SignalingChannel::connect(ws_url, &ctx.room).await?;
        let sink = channel.sink();

        let chat = ChatStream::new(ctx.clone(), sink.clone());
        let call = CallSession::spawn(ctx.clone(), connector.clone(), media, sink.clone());
        let stream = StreamSession::spawn(ctx.clone(), connector, api.clone(), sink);

        let router = SubjectRouter::new(ctx.clone(), chat.clone(), call.commands(), stream.commands());
        channel.spawn_receive(router);

        info!(
            "Joined room {} as {}",
            ctx.room, ctx.participant
        );

        Ok(Self {
            ctx,
            chat,
            call,
            stream,
            channel,
            api,
        })
    }

    pub fn chat(&self) -> &ChatStream {
        &self.chat
    }

    pub fn call(&self) -> &CallHandle {
        &self.call
    }

    pub fn stream(&self) -> &StreamHandle {
        &self.stream
    }

    pub fn channel_status(&self) -> watch::Receiver<ChannelStatus> {
        self.channel.status()
    }

    pub async fn remote_holder(&self) -> Result<RemoteHolder> {
        self.api.remote_holder(&self.ctx.room).await
    }

    pub async fn is_remote_holder(&self) -> Result<bool> {
        Ok(self.remote_holder().await?.user_id == self.ctx.participant)
    }

    /// End both sessions and close the channel. Must complete before joining
    /// another room.
    ///
    /// The channel closes only after both actors report teardown, so their
    /// final `webrtc.disconnect` / `stream.stop-stream` frames are already
    /// queued and get flushed rather than dropped.
    pub async fn leave(self) {
        self.call.hang_up().await;
        self.stream.stop().await;

        let mut call_status = self.call.status();
        let mut stream_status = self.stream.status();
        let confirmed = tokio::time::timeout(LEAVE_TIMEOUT, async {
            let _ = call_status.wait_for(|s| s.phase == CallPhase::Idle).await;
            let _ = stream_status
                .wait_for(|s| s.state == StreamState::Disconnected)
                .await;
        })
        .await;
        if confirmed.is_err() {
            warn!(
                "Leaving room {} before the sessions confirmed teardown",
                self.ctx.room
            );
        }

        self.channel.close();
        info!("Left room {}", self.ctx.room);
    }
}
