use crate::integration::{create_router, init_tracing};
use parlor_client::StreamCommand;
use parlor_core::{Frame, ParticipantId, RoomId, StreamKind};

/// Stream subjects are addressed to one participant; frames for anyone else
/// on the shared channel must not reach the local stream session.
#[tokio::test]
async fn test_stream_frame_for_other_participant_ignored() {
    init_tracing();

    let mut fixture = create_router();

    let for_bob = Frame::stream(
        StreamKind::Offer,
        RoomId::from("r1"),
        Some(ParticipantId::from("bob")),
        ParticipantId::from("server"),
        "bob-offer-sdp",
    )
    .unwrap();
    fixture.router.route(for_bob).await;
    assert!(fixture.stream_rx.try_recv().is_err());

    let for_alice = Frame::stream(
        StreamKind::Offer,
        RoomId::from("r1"),
        Some(ParticipantId::from("alice")),
        ParticipantId::from("server"),
        "alice-offer-sdp",
    )
    .unwrap();
    fixture.router.route(for_alice).await;

    match fixture.stream_rx.try_recv() {
        Ok(StreamCommand::RemoteOffer(sdp)) => assert_eq!(sdp, "alice-offer-sdp"),
        other => panic!("Expected a routed stream offer, got {:?}", other),
    }
}
