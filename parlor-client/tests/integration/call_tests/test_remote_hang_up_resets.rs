use crate::integration::{
    create_call_session, expect_no_frame, init_tracing, next_frame, wait_for_status,
};
use parlor_client::{CallCommand, CallPhase};
use parlor_core::SessionDescription;

/// `webrtc.disconnect` ends the call symmetrically: resources are released
/// but no disconnect frame is sent back.
#[tokio::test]
async fn test_remote_hang_up_resets() {
    init_tracing();

    let mut fixture = create_call_session();
    let commands = fixture.handle.commands();

    commands
        .send(CallCommand::RemoteOffer(SessionDescription::offer(
            "remote-offer-sdp",
        )))
        .await
        .unwrap();
    let answer_frame = next_frame(&mut fixture.frames).await;
    assert_eq!(answer_frame.subject, "webrtc.answer.r1");

    commands.send(CallCommand::RemoteHangUp).await.unwrap();

    let mut status = fixture.handle.status();
    wait_for_status(&mut status, |s| s.phase == CallPhase::Idle, "Idle").await;

    assert!(fixture.connector.handle().was_closed().await);
    assert_eq!(fixture.media.released(), 1);
    expect_no_frame(&mut fixture.frames).await;
}
