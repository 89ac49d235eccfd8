use parlor_core::IceCandidate;

/// Inputs to the virtual-browser stream state machine.
#[derive(Debug)]
pub enum StreamCommand {
    /// Local "start stream" action: ask the server to provision a stream and
    /// wait for its offer.
    Start,

    /// Local "stop stream" action.
    Stop,

    /// `stream.offer.<room>.<self>` — the server's offer, as a bare SDP
    /// string. The router has already verified the addressing.
    RemoteOffer(String),

    /// `stream.ice.<room>.<self>`.
    RemoteIce(IceCandidate),
}
