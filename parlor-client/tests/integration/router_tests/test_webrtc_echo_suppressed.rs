use crate::integration::{create_router, init_tracing};
use parlor_client::CallCommand;
use parlor_core::{Frame, IceCandidate, ParticipantId, RoomId, WebrtcKind};

/// The broker echoes webrtc publishes to everyone in the room, including the
/// publisher. Our own frames are dropped; everyone else's go through.
#[tokio::test]
async fn test_webrtc_echo_suppressed() {
    init_tracing();

    let mut fixture = create_router();

    let own_echo = Frame::webrtc(
        WebrtcKind::Ice,
        RoomId::from("r1"),
        ParticipantId::from("alice"),
        &IceCandidate::new("own-candidate"),
    )
    .unwrap();
    fixture.router.route(own_echo).await;
    assert!(fixture.call_rx.try_recv().is_err());

    let from_bob = Frame::webrtc(
        WebrtcKind::Ice,
        RoomId::from("r1"),
        ParticipantId::from("bob"),
        &IceCandidate::new("bob-candidate"),
    )
    .unwrap();
    fixture.router.route(from_bob).await;

    match fixture.call_rx.try_recv() {
        Ok(CallCommand::RemoteIce(candidate)) => assert_eq!(candidate.candidate, "bob-candidate"),
        other => panic!("Expected a routed ICE candidate, got {:?}", other),
    }
}
