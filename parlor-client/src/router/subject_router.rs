use crate::call::CallCommand;
use crate::chat::ChatStream;
use crate::session::SessionContext;
use crate::stream::StreamCommand;
use parlor_core::{Frame, IceCandidate, SessionDescription, StreamKind, Subject, WebrtcKind};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Classifies every inbound frame by its subject and hands it to the chat
/// stream or one of the session actors. Owns no state of its own.
///
/// Anything that does not match the local room (and, for `stream`, the local
/// participant) is logged and dropped: the channel is shared, and a mismatch
/// must never leak into another room's sessions.
#[derive(Clone)]
pub struct SubjectRouter {
    ctx: SessionContext,
    chat: ChatStream,
    call_tx: mpsc::Sender<CallCommand>,
    stream_tx: mpsc::Sender<StreamCommand>,
}

impl SubjectRouter {
    pub fn new(
        ctx: SessionContext,
        chat: ChatStream,
        call_tx: mpsc::Sender<CallCommand>,
        stream_tx: mpsc::Sender<StreamCommand>,
    ) -> Self {
        Self {
            ctx,
            chat,
            call_tx,
            stream_tx,
        }
    }

    pub async fn route(&self, frame: Frame) {
        let subject = match frame.subject() {
            Ok(subject) => subject,
            Err(e) => {
                warn!("Discarding frame with subject '{}': {}", frame.subject, e);
                return;
            }
        };

        if subject.room() != &self.ctx.room {
            warn!(
                "Discarding frame for room {} while in {}",
                subject.room(),
                self.ctx.room
            );
            return;
        }

        match subject {
            Subject::Chat { .. } => self.chat.on_remote(frame).await,
            Subject::Webrtc { kind, .. } => self.route_webrtc(kind, frame).await,
            Subject::Stream {
                kind, participant, ..
            } => self.route_stream(kind, participant, frame).await,
        }
    }

    async fn route_webrtc(&self, kind: WebrtcKind, frame: Frame) {
        // The broker echoes every publish back to the publisher.
        if frame.sender == self.ctx.participant {
            debug!("Suppressing echo of own webrtc frame");
            return;
        }

        let cmd = match kind {
            WebrtcKind::Sdp => match frame.payload_as::<SessionDescription>() {
                Ok(offer) => CallCommand::RemoteOffer(offer),
                Err(e) => {
                    warn!("Discarding webrtc offer with bad payload: {}", e);
                    return;
                }
            },
            WebrtcKind::Answer => match frame.payload_as::<SessionDescription>() {
                Ok(answer) => CallCommand::RemoteAnswer(answer),
                Err(e) => {
                    warn!("Discarding webrtc answer with bad payload: {}", e);
                    return;
                }
            },
            WebrtcKind::Ice => match frame.payload_as::<IceCandidate>() {
                Ok(candidate) => CallCommand::RemoteIce(candidate),
                Err(e) => {
                    warn!("Discarding webrtc ICE with bad payload: {}", e);
                    return;
                }
            },
            WebrtcKind::Disconnect => CallCommand::RemoteHangUp,
        };

        if self.call_tx.send(cmd).await.is_err() {
            warn!("Call session is gone; dropping webrtc frame");
        }
    }

    async fn route_stream(
        &self,
        kind: StreamKind,
        participant: Option<parlor_core::ParticipantId>,
        frame: Frame,
    ) {
        let Some(participant) = participant else {
            // stop-stream only travels client-to-server.
            debug!("Ignoring inbound stop-stream frame");
            return;
        };
        if participant != self.ctx.participant {
            warn!(
                "Discarding stream frame addressed to {} (self is {})",
                participant, self.ctx.participant
            );
            return;
        }

        let cmd = match kind {
            StreamKind::Offer => match frame.payload_as::<String>() {
                Ok(sdp) => StreamCommand::RemoteOffer(sdp),
                Err(e) => {
                    warn!("Discarding stream offer with bad payload: {}", e);
                    return;
                }
            },
            StreamKind::Ice => match frame.payload_as::<IceCandidate>() {
                Ok(candidate) => StreamCommand::RemoteIce(candidate),
                Err(e) => {
                    warn!("Discarding stream ICE with bad payload: {}", e);
                    return;
                }
            },
            // Answers originate here; an inbound one is a broker echo.
            StreamKind::Answer | StreamKind::StopStream => {
                debug!("Ignoring inbound stream {:?} frame", kind);
                return;
            }
        };

        if self.stream_tx.send(cmd).await.is_err() {
            warn!("Stream session is gone; dropping stream frame");
        }
    }
}
