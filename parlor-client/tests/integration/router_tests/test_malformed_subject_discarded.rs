use crate::integration::{create_router, init_tracing};
use parlor_core::{Frame, ParticipantId};
use serde_json::json;

/// Unknown domains and truncated subjects are logged and dropped without
/// disturbing any session.
#[tokio::test]
async fn test_malformed_subject_discarded() {
    init_tracing();

    let mut fixture = create_router();

    for subject in ["presence.r1", "webrtc.sdp", "chat", "", "stream.offer.r1"] {
        let frame = Frame {
            subject: subject.to_string(),
            sender: ParticipantId::from("bob"),
            payload: json!({}),
        };
        fixture.router.route(frame).await;
    }

    assert!(fixture.call_rx.try_recv().is_err());
    assert!(fixture.stream_rx.try_recv().is_err());
    assert!(fixture.chat.history().await.is_empty());
}
