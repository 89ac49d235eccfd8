use crate::integration::{create_router, init_tracing};
use parlor_core::{Frame, ParticipantId, RoomId, SessionDescription, WebrtcKind};

/// Frames for another room never reach any session, whatever the domain.
#[tokio::test]
async fn test_room_mismatch_discarded() {
    init_tracing();

    let mut fixture = create_router();

    let other_room = Frame::webrtc(
        WebrtcKind::Sdp,
        RoomId::from("r2"),
        ParticipantId::from("bob"),
        &SessionDescription::offer("bob-offer"),
    )
    .unwrap();
    fixture.router.route(other_room).await;
    assert!(fixture.call_rx.try_recv().is_err());

    let other_chat = Frame::chat(
        RoomId::from("r2"),
        ParticipantId::from("bob"),
        &parlor_core::ChatMessage::new(
            RoomId::from("r2"),
            ParticipantId::from("bob"),
            "Bob",
            "wrong room",
        )
        .payload(),
    )
    .unwrap();
    fixture.router.route(other_chat).await;
    assert!(fixture.chat.history().await.is_empty());
}
