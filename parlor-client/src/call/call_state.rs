use crate::peer::{MediaSource, MediaTrack, PeerHandle};
use parlor_core::IceCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallPhase {
    #[default]
    Idle,
    OfferSent,
    AnswerSent,
    Connected,
}

/// Observable snapshot of the call, published over a watch channel for the
/// rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallStatus {
    pub phase: CallPhase,
    pub remote_tracks: Vec<MediaTrack>,
}

/// Everything one active call owns. Dropped wholesale on teardown.
pub(crate) struct CallLeg {
    pub peer: Box<dyn PeerHandle>,
    pub local_media: MediaSource,
    pub remote_tracks: Vec<MediaTrack>,
    /// Local candidates discovered before the remote description was set;
    /// announced in discovery order once it is.
    pub unannounced: Vec<IceCandidate>,
    pub remote_description_set: bool,
    pub phase: CallPhase,
}

impl CallLeg {
    pub fn new(peer: Box<dyn PeerHandle>, local_media: MediaSource, phase: CallPhase) -> Self {
        Self {
            peer,
            local_media,
            remote_tracks: Vec::new(),
            unannounced: Vec::new(),
            remote_description_set: false,
            phase,
        }
    }
}

/// The same session plays exactly one of two roles per call; which one is
/// decided by whether a local "start" or a remote offer arrives first.
pub(crate) enum CallState {
    Idle,
    Initiator(CallLeg),
    Responder(CallLeg),
}

impl CallState {
    pub fn is_idle(&self) -> bool {
        matches!(self, CallState::Idle)
    }

    pub fn leg_mut(&mut self) -> Option<&mut CallLeg> {
        match self {
            CallState::Idle => None,
            CallState::Initiator(leg) | CallState::Responder(leg) => Some(leg),
        }
    }

    pub fn leg(&self) -> Option<&CallLeg> {
        match self {
            CallState::Idle => None,
            CallState::Initiator(leg) | CallState::Responder(leg) => Some(leg),
        }
    }
}
