use crate::api::RoomApi;
use crate::channel::FrameSink;
use crate::peer::{PeerConnectionState, PeerConnector, PeerEvent, PeerHandle};
use crate::session::SessionContext;
use crate::stream::stream_command::StreamCommand;
use crate::stream::stream_state::{StreamLeg, StreamState, StreamStatus};
use anyhow::{Context, Result};
use parlor_core::{Frame, IceCandidate, SessionDescription, StreamKind};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct StreamHandle {
    cmd_tx: mpsc::Sender<StreamCommand>,
    status_rx: watch::Receiver<StreamStatus>,
}

impl StreamHandle {
    pub async fn start(&self) {
        let _ = self.cmd_tx.send(StreamCommand::Start).await;
    }

    pub async fn stop(&self) {
        let _ = self.cmd_tx.send(StreamCommand::Stop).await;
    }

    pub fn status(&self) -> watch::Receiver<StreamStatus> {
        self.status_rx.clone()
    }

    pub fn commands(&self) -> mpsc::Sender<StreamCommand> {
        self.cmd_tx.clone()
    }
}

/// Virtual-browser viewer state machine, independent of the call session.
///
/// The offering side is a server process: the offer arrives over the channel
/// after an out-of-band provisioning request, only the designated remote
/// holder is addressed, and answer-side candidates are batched until ICE
/// gathering completes instead of trickled one by one.
pub struct StreamSession {
    ctx: SessionContext,
    connector: Arc<dyn PeerConnector>,
    api: Arc<dyn RoomApi>,
    sink: Arc<dyn FrameSink>,
    command_rx: mpsc::Receiver<StreamCommand>,
    peer_rx: mpsc::Receiver<PeerEvent>,
    peer_tx: mpsc::Sender<PeerEvent>,
    status_tx: watch::Sender<StreamStatus>,
    state: StreamState,
    leg: Option<StreamLeg>,
}

impl StreamSession {
    pub fn spawn(
        ctx: SessionContext,
        connector: Arc<dyn PeerConnector>,
        api: Arc<dyn RoomApi>,
        sink: Arc<dyn FrameSink>,
    ) -> StreamHandle {
        let (cmd_tx, command_rx) = mpsc::channel(64);
        let (peer_tx, peer_rx) = mpsc::channel(256);
        let (status_tx, status_rx) = watch::channel(StreamStatus::default());

        let session = Self {
            ctx,
            connector,
            api,
            sink,
            command_rx,
            peer_rx,
            peer_tx,
            status_tx,
            state: StreamState::Disconnected,
            leg: None,
        };
        tokio::spawn(session.run());

        StreamHandle { cmd_tx, status_rx }
    }

    pub async fn run(mut self) {
        info!("Stream session loop started");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => break,
                    }
                }

                evt = self.peer_rx.recv() => {
                    match evt {
                        Some(e) => self.handle_peer_event(e).await,
                        None => break,
                    }
                }
            }
        }

        self.teardown().await;
        info!("Stream session loop finished");
    }

    async fn handle_command(&mut self, cmd: StreamCommand) {
        match cmd {
            StreamCommand::Start => {
                if self.state != StreamState::Disconnected {
                    warn!("Ignoring start: stream already {:?}", self.state);
                    return;
                }
                match self.api.provision_stream(&self.ctx.room).await {
                    Ok(()) => {
                        info!("Stream provisioned, waiting for server offer");
                        self.set_state(StreamState::Connecting);
                    }
                    Err(e) => error!("Failed to provision stream: {:?}", e),
                }
            }

            StreamCommand::Stop => {
                if self.state == StreamState::Disconnected && self.leg.is_none() {
                    debug!("Stream already stopped");
                    return;
                }
                self.send_stop().await;
                self.teardown().await;
            }

            StreamCommand::RemoteOffer(sdp) => {
                if self.leg.is_some() {
                    warn!("Ignoring stream offer: negotiation already in progress");
                    return;
                }
                if self.state == StreamState::Disconnected {
                    // Another participant provisioned the stream; we are the
                    // remote holder, so the offer lands here regardless.
                    debug!("Server offer without a local start");
                    self.set_state(StreamState::Connecting);
                }
                if let Err(e) = self.accept_offer(sdp).await {
                    // No automatic retry; the user restarts the stream.
                    error!("Failed to answer stream offer: {:?}", e);
                }
            }

            StreamCommand::RemoteIce(candidate) => match &self.leg {
                // The server only sends ICE after its offer, so the remote
                // description is set by construction whenever a leg exists.
                Some(leg) => {
                    if let Err(e) = leg.peer.add_ice_candidate(candidate).await {
                        warn!("Failed to add stream ICE candidate: {:?}", e);
                    }
                }
                None => warn!("Dropping stream ICE candidate received before the offer"),
            },
        }
    }

    async fn handle_peer_event(&mut self, event: PeerEvent) {
        match event {
            PeerEvent::CandidateDiscovered(candidate) => {
                let Some(leg) = &mut self.leg else {
                    debug!("Ignoring discovered candidate: no stream leg");
                    return;
                };
                if leg.gathering_complete {
                    self.announce_candidate(candidate).await;
                } else {
                    leg.deferred.push(candidate);
                }
            }

            PeerEvent::GatheringStateChanged(state) => {
                debug!("Stream ICE gathering state: {:?}", state);
                if state != crate::peer::IceGatheringState::Complete {
                    return;
                }
                let Some(leg) = &mut self.leg else { return };
                leg.gathering_complete = true;
                let batch = std::mem::take(&mut leg.deferred);
                for candidate in batch {
                    self.announce_candidate(candidate).await;
                }
            }

            PeerEvent::TrackReceived(track) => {
                let Some(leg) = &mut self.leg else {
                    debug!("Ignoring stream track: no stream leg");
                    return;
                };
                debug!("Stream track received: {:?}", track.kind);
                leg.received_tracks.push(track);
                if self.state == StreamState::Connected {
                    self.publish_status();
                }
            }

            PeerEvent::ConnectionStateChanged(state) => match state {
                PeerConnectionState::Connected => {
                    info!("Stream transport connected");
                    self.set_state(StreamState::Connected);
                }
                PeerConnectionState::Failed
                | PeerConnectionState::Disconnected
                | PeerConnectionState::Closed => {
                    if self.leg.is_some() {
                        warn!("Stream transport lost ({:?}), tearing down", state);
                        self.teardown().await;
                    }
                }
                _ => debug!("Stream transport state: {:?}", state),
            },
        }
    }

    /// Apply the server's offer and answer it on a fresh peer session.
    async fn accept_offer(&mut self, sdp: String) -> Result<()> {
        let peer = self
            .connector
            .connect(self.peer_tx.clone())
            .await
            .context("Failed to create stream peer session")?;

        let negotiated = self.answer_on(&*peer, sdp).await;
        match negotiated {
            Ok(()) => {
                self.leg = Some(StreamLeg::new(peer));
                Ok(())
            }
            Err(e) => {
                if let Err(close_err) = peer.close().await {
                    warn!("Failed to close aborted stream peer: {:?}", close_err);
                }
                Err(e)
            }
        }
    }

    async fn answer_on(&self, peer: &dyn PeerHandle, sdp: String) -> Result<()> {
        peer.set_remote_description(SessionDescription::offer(sdp))
            .await
            .context("Stream offer rejected")?;

        let answer = peer
            .create_answer()
            .await
            .context("Failed to create stream answer")?;

        let frame = Frame::stream(
            StreamKind::Answer,
            self.ctx.room.clone(),
            Some(self.ctx.participant.clone()),
            self.ctx.participant.clone(),
            &answer,
        )?;
        self.sink.send(frame).await;
        Ok(())
    }

    async fn announce_candidate(&self, candidate: IceCandidate) {
        match Frame::stream(
            StreamKind::Ice,
            self.ctx.room.clone(),
            Some(self.ctx.participant.clone()),
            self.ctx.participant.clone(),
            &candidate,
        ) {
            Ok(frame) => self.sink.send(frame).await,
            Err(e) => warn!("Failed to build stream ICE frame: {}", e),
        }
    }

    async fn send_stop(&self) {
        match Frame::stream(
            StreamKind::StopStream,
            self.ctx.room.clone(),
            None,
            self.ctx.participant.clone(),
            "",
        ) {
            Ok(frame) => self.sink.send(frame).await,
            Err(e) => warn!("Failed to build stop-stream frame: {}", e),
        }
    }

    /// Close the peer and drop its media sink. Idempotent.
    async fn teardown(&mut self) {
        if let Some(leg) = self.leg.take() {
            if let Err(e) = leg.peer.close().await {
                warn!("Failed to close stream peer session: {:?}", e);
            }
        }
        self.set_state(StreamState::Disconnected);
        info!("Stream torn down");
    }

    fn set_state(&mut self, state: StreamState) {
        self.state = state;
        self.publish_status();
    }

    fn publish_status(&self) {
        let tracks = match (&self.leg, self.state) {
            (Some(leg), StreamState::Connected) => leg.received_tracks.clone(),
            _ => Vec::new(),
        };
        self.status_tx.send_replace(StreamStatus {
            state: self.state,
            tracks,
        });
    }
}
