use crate::integration::{create_call_session, expect_no_frame, init_tracing};
use parlor_client::{CallCommand, CallPhase};
use parlor_core::SessionDescription;

/// A refused peer connection on start leaves nothing behind: the acquired
/// media is released and the session stays idle, with no retry.
#[tokio::test]
async fn test_refused_connection_resets() {
    init_tracing();

    let mut fixture = create_call_session();
    fixture.connector.refuse_connections();

    fixture.handle.start().await;
    expect_no_frame(&mut fixture.frames).await;

    assert_eq!(fixture.media.acquired(), 1);
    assert_eq!(fixture.media.released(), 1);
    let status = fixture.handle.status();
    assert_eq!(status.borrow().phase, CallPhase::Idle);
}

/// An offer the peer rejects aborts the responder path: the half-built peer
/// is closed, media is released, and no answer hits the wire.
#[tokio::test]
async fn test_rejected_offer_resets() {
    init_tracing();

    let mut fixture = create_call_session();
    fixture.connector.handle().reject_remote_descriptions();
    let commands = fixture.handle.commands();

    commands
        .send(CallCommand::RemoteOffer(SessionDescription::offer(
            "unacceptable-offer",
        )))
        .await
        .unwrap();
    expect_no_frame(&mut fixture.frames).await;

    assert!(fixture.connector.handle().was_closed().await);
    assert_eq!(fixture.media.released(), 1);
    let status = fixture.handle.status();
    assert_eq!(status.borrow().phase, CallPhase::Idle);
}
