use crate::call::call_command::CallCommand;
use crate::call::call_state::{CallLeg, CallPhase, CallState, CallStatus};
use crate::channel::FrameSink;
use crate::peer::{
    MediaGateway, MediaSource, PeerConnectionState, PeerConnector, PeerEvent, PeerHandle,
};
use crate::session::SessionContext;
use anyhow::{Context, Result};
use parlor_core::{Frame, IceCandidate, SessionDescription, WebrtcKind};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Handle the rest of the client holds onto; the session itself runs as a
/// spawned task and dies when the last command sender is dropped.
#[derive(Clone)]
pub struct CallHandle {
    cmd_tx: mpsc::Sender<CallCommand>,
    status_rx: watch::Receiver<CallStatus>,
}

impl CallHandle {
    pub async fn start(&self) {
        let _ = self.cmd_tx.send(CallCommand::Start).await;
    }

    pub async fn hang_up(&self) {
        let _ = self.cmd_tx.send(CallCommand::HangUp).await;
    }

    pub fn status(&self) -> watch::Receiver<CallStatus> {
        self.status_rx.clone()
    }

    pub fn commands(&self) -> mpsc::Sender<CallCommand> {
        self.cmd_tx.clone()
    }
}

/// Peer-to-peer call state machine, one instance per room visit.
///
/// Runs as a single-task actor: user commands, routed frames and peer
/// callbacks all arrive as messages, so every mutation of the candidate
/// queues and the negotiation state happens inside one event-processing step.
pub struct CallSession {
    ctx: SessionContext,
    connector: Arc<dyn PeerConnector>,
    media: Arc<dyn MediaGateway>,
    sink: Arc<dyn FrameSink>,
    command_rx: mpsc::Receiver<CallCommand>,
    peer_rx: mpsc::Receiver<PeerEvent>,
    peer_tx: mpsc::Sender<PeerEvent>,
    status_tx: watch::Sender<CallStatus>,
    state: CallState,
    /// Remote candidates that arrived before a remote description existed.
    /// Applying them early is a protocol violation, so they wait here.
    pending_candidates: VecDeque<IceCandidate>,
}

impl CallSession {
    pub fn spawn(
        ctx: SessionContext,
        connector: Arc<dyn PeerConnector>,
        media: Arc<dyn MediaGateway>,
        sink: Arc<dyn FrameSink>,
    ) -> CallHandle {
        let (cmd_tx, command_rx) = mpsc::channel(64);
        let (peer_tx, peer_rx) = mpsc::channel(256);
        let (status_tx, status_rx) = watch::channel(CallStatus::default());

        let session = Self {
            ctx,
            connector,
            media,
            sink,
            command_rx,
            peer_rx,
            peer_tx,
            status_tx,
            state: CallState::Idle,
            pending_candidates: VecDeque::new(),
        };
        tokio::spawn(session.run());

        CallHandle { cmd_tx, status_rx }
    }

    pub async fn run(mut self) {
        info!("Call session loop started");

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
        info!("Call session loop finished");
    }

    async fn handle_command(&mut self, cmd: CallCommand) {
        match cmd {
            CallCommand::Start => {
                if !self.state.is_idle() {
                    warn!("Ignoring start: a call is already in progress");
                    return;
                }
                if let Err(e) = self.start_call().await {
                    error!("Failed to start call: {:?}", e);
                    self.teardown().await;
                }
            }

            CallCommand::HangUp => {
                // The disconnect frame must be queued before teardown reports
                // idle, so an owner that waits for idle and then closes the
                // channel cannot strand it.
                if !self.state.is_idle() {
                    self.send_disconnect().await;
                }
                self.teardown().await;
            }

            CallCommand::RemoteOffer(offer) => {
                if !self.state.is_idle() {
                    warn!("Ignoring remote offer: a call is already in progress");
                    return;
                }
                if let Err(e) = self.accept_offer(offer).await {
                    error!("Failed to answer call: {:?}", e);
                    self.teardown().await;
                }
            }

            CallCommand::RemoteAnswer(answer) => {
                if let Err(e) = self.apply_answer(answer).await {
                    error!("Failed to apply answer: {:?}", e);
                    self.teardown().await;
                }
            }

            CallCommand::RemoteIce(candidate) => {
                match self.state.leg_mut() {
                    Some(leg) if leg.remote_description_set => {
                        if let Err(e) = leg.peer.add_ice_candidate(candidate).await {
                            warn!("Failed to add remote ICE candidate: {:?}", e);
                        }
                    }
                    _ => {
                        debug!("Queueing remote ICE candidate until a remote description is set");
                        self.pending_candidates.push_back(candidate);
                    }
                }
            }

            CallCommand::RemoteHangUp => {
                info!("Remote peer hung up");
                self.teardown().await;
            }
        }
    }

    async fn handle_peer_event(&mut self, event: PeerEvent) {
        match event {
            PeerEvent::CandidateDiscovered(candidate) => {
                match self.state.leg_mut() {
                    Some(leg) if leg.remote_description_set => {}
                    Some(leg) => {
                        leg.unannounced.push(candidate);
                        return;
                    }
                    None => {
                        debug!("Ignoring discovered candidate: no active call");
                        return;
                    }
                }
                self.announce_candidate(candidate).await;
            }

            PeerEvent::TrackReceived(track) => {
                let Some(leg) = self.state.leg_mut() else {
                    debug!("Ignoring remote track: no active call");
                    return;
                };
                debug!("Remote track received: {:?}", track.kind);
                leg.remote_tracks.push(track);
                self.publish_status();
            }

            PeerEvent::ConnectionStateChanged(state) => match state {
                PeerConnectionState::Connected => {
                    if let Some(leg) = self.state.leg_mut() {
                        info!("Call transport connected");
                        leg.phase = CallPhase::Connected;
                        self.publish_status();
                    }
                }
                PeerConnectionState::Failed
                | PeerConnectionState::Disconnected
                | PeerConnectionState::Closed => {
                    if !self.state.is_idle() {
                        warn!("Call transport lost ({:?}), tearing down", state);
                        self.teardown().await;
                    }
                }
                _ => debug!("Call transport state: {:?}", state),
            },

            // The call path announces candidates one by one; only the stream
            // session batches on gathering completion.
            PeerEvent::GatheringStateChanged(state) => {
                debug!("Call ICE gathering state: {:?}", state);
            }
        }
    }

    /// Initiator path: acquire media, create the peer, offer, transmit.
    async fn start_call(&mut self) -> Result<()> {
        let Some(local_media) = self.media.acquire().await else {
            anyhow::bail!("No local media source available");
        };

        match self.open_offering_peer(&local_media).await {
            Ok(peer) => {
                self.state =
                    CallState::Initiator(CallLeg::new(peer, local_media, CallPhase::OfferSent));
                self.publish_status();
                Ok(())
            }
            Err(e) => {
                self.media.release(local_media).await;
                Err(e)
            }
        }
    }

    async fn open_offering_peer(&self, local_media: &MediaSource) -> Result<Box<dyn PeerHandle>> {
        let peer = self
            .connector
            .connect(self.peer_tx.clone())
            .await
            .context("Failed to create peer session")?;

        let negotiated = self.offer_on(&*peer, local_media).await;
        match negotiated {
            Ok(()) => Ok(peer),
            Err(e) => {
                if let Err(close_err) = peer.close().await {
                    warn!("Failed to close aborted peer session: {:?}", close_err);
                }
                Err(e)
            }
        }
    }

    async fn offer_on(&self, peer: &dyn PeerHandle, local_media: &MediaSource) -> Result<()> {
        for track in &local_media.tracks {
            peer.add_track(track.clone())
                .await
                .context("Failed to add local track")?;
        }

        let offer = peer.create_offer().await.context("Failed to create offer")?;

        // The wire calls the offer "sdp"; a quirk kept for compatibility.
        let frame = Frame::webrtc(
            WebrtcKind::Sdp,
            self.ctx.room.clone(),
            self.ctx.participant.clone(),
            &offer,
        )?;
        self.sink.send(frame).await;
        Ok(())
    }

    /// Responder path, driven entirely by receipt of `webrtc.sdp`.
    async fn accept_offer(&mut self, offer: SessionDescription) -> Result<()> {
        let Some(local_media) = self.media.acquire().await else {
            anyhow::bail!("No local media source available");
        };

        match self.open_answering_peer(&local_media, offer).await {
            Ok(peer) => {
                let mut leg = CallLeg::new(peer, local_media, CallPhase::AnswerSent);
                leg.remote_description_set = true;
                self.state = CallState::Responder(leg);
                self.publish_status();
                Ok(())
            }
            Err(e) => {
                self.media.release(local_media).await;
                Err(e)
            }
        }
    }

    async fn open_answering_peer(
        &mut self,
        local_media: &MediaSource,
        offer: SessionDescription,
    ) -> Result<Box<dyn PeerHandle>> {
        let peer = self
            .connector
            .connect(self.peer_tx.clone())
            .await
            .context("Failed to create peer session")?;

        let negotiated = self.answer_on(&*peer, local_media, offer).await;
        match negotiated {
            Ok(()) => Ok(peer),
            Err(e) => {
                if let Err(close_err) = peer.close().await {
                    warn!("Failed to close aborted peer session: {:?}", close_err);
                }
                Err(e)
            }
        }
    }

    async fn answer_on(
        &mut self,
        peer: &dyn PeerHandle,
        local_media: &MediaSource,
        offer: SessionDescription,
    ) -> Result<()> {
        peer.set_remote_description(offer)
            .await
            .context("Offer rejected")?;

        // Candidates that raced ahead of the offer, in arrival order.
        while let Some(candidate) = self.pending_candidates.pop_front() {
            if let Err(e) = peer.add_ice_candidate(candidate).await {
                warn!("Failed to apply queued ICE candidate: {:?}", e);
            }
        }

        for track in &local_media.tracks {
            peer.add_track(track.clone())
                .await
                .context("Failed to add local track")?;
        }

        let answer = peer
            .create_answer()
            .await
            .context("Failed to create answer")?;

        let frame = Frame::webrtc(
            WebrtcKind::Answer,
            self.ctx.room.clone(),
            self.ctx.participant.clone(),
            &answer,
        )?;
        self.sink.send(frame).await;
        Ok(())
    }

    /// Initiator receives `webrtc.answer`: the negotiation is complete.
    async fn apply_answer(&mut self, answer: SessionDescription) -> Result<()> {
        let CallState::Initiator(leg) = &mut self.state else {
            warn!("Ignoring answer: not the initiator of a call");
            return Ok(());
        };
        if leg.phase != CallPhase::OfferSent {
            warn!("Ignoring answer in phase {:?}", leg.phase);
            return Ok(());
        }

        leg.peer
            .set_remote_description(answer)
            .await
            .context("Answer rejected")?;
        leg.remote_description_set = true;

        while let Some(candidate) = self.pending_candidates.pop_front() {
            if let Err(e) = leg.peer.add_ice_candidate(candidate).await {
                warn!("Failed to apply queued ICE candidate: {:?}", e);
            }
        }

        // Local candidates held back while no remote description existed.
        let held = std::mem::take(&mut leg.unannounced);
        leg.phase = CallPhase::Connected;
        for candidate in held {
            self.announce_candidate(candidate).await;
        }

        self.publish_status();
        Ok(())
    }

    async fn announce_candidate(&self, candidate: IceCandidate) {
        match Frame::webrtc(
            WebrtcKind::Ice,
            self.ctx.room.clone(),
            self.ctx.participant.clone(),
            &candidate,
        ) {
            Ok(frame) => self.sink.send(frame).await,
            Err(e) => warn!("Failed to build ICE frame: {}", e),
        }
    }

    async fn send_disconnect(&self) {
        match Frame::webrtc(
            WebrtcKind::Disconnect,
            self.ctx.room.clone(),
            self.ctx.participant.clone(),
            serde_json::json!({ "message": "Call Ended" }),
        ) {
            Ok(frame) => self.sink.send(frame).await,
            Err(e) => warn!("Failed to build disconnect frame: {}", e),
        }
    }

    /// Stop local media, drop the remote sink, close the peer and clear the
    /// candidate queue. Safe to call in any state, any number of times.
    async fn teardown(&mut self) {
        self.pending_candidates.clear();

        let state = std::mem::replace(&mut self.state, CallState::Idle);
        let leg = match state {
            CallState::Idle => return,
            CallState::Initiator(leg) | CallState::Responder(leg) => leg,
        };

        self.media.release(leg.local_media).await;
        if let Err(e) = leg.peer.close().await {
            warn!("Failed to close peer session: {:?}", e);
        }
        self.publish_status();
        info!("Call torn down");
    }

    fn publish_status(&self) {
        let status = match self.state.leg() {
            Some(leg) => CallStatus {
                phase: leg.phase,
                remote_tracks: leg.remote_tracks.clone(),
            },
            None => CallStatus::default(),
        };
        self.status_tx.send_replace(status);
    }
}
