use parlor_core::{IceCandidate, SessionDescription};

/// Inputs to the call state machine: local user actions plus the `webrtc.*`
/// frames the router classified for us.
#[derive(Debug)]
pub enum CallCommand {
    /// Local "start call" action: acquire media and send an offer.
    Start,

    /// Local "hang up" action: tear down and notify the remote peer.
    HangUp,

    /// `webrtc.sdp` — the remote peer is calling us.
    RemoteOffer(SessionDescription),

    /// `webrtc.answer` — the remote peer accepted our offer.
    RemoteAnswer(SessionDescription),

    /// `webrtc.ice` — a network path discovered by the remote peer.
    RemoteIce(IceCandidate),

    /// `webrtc.disconnect` — the remote peer hung up.
    RemoteHangUp,
}
