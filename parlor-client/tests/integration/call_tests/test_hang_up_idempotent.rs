use crate::integration::{
    create_call_session, expect_no_frame, init_tracing, next_frame, settle, wait_for_status,
};
use parlor_client::CallPhase;

#[tokio::test]
async fn test_hang_up_idempotent() {
    init_tracing();

    let mut fixture = create_call_session();

    fixture.handle.start().await;
    let offer_frame = next_frame(&mut fixture.frames).await;
    assert_eq!(offer_frame.subject, "webrtc.sdp.r1");

    fixture.handle.hang_up().await;

    let disconnect_frame = next_frame(&mut fixture.frames).await;
    assert_eq!(disconnect_frame.subject, "webrtc.disconnect.r1");

    let mut status = fixture.handle.status();
    wait_for_status(&mut status, |s| s.phase == CallPhase::Idle, "Idle").await;

    assert!(fixture.connector.handle().was_closed().await);
    assert_eq!(fixture.media.released(), 1);

    // Second hang-up: no error, no second disconnect, still idle.
    fixture.handle.hang_up().await;
    expect_no_frame(&mut fixture.frames).await;
    settle().await;
    assert_eq!(*status.borrow(), parlor_client::CallStatus::default());
    assert_eq!(fixture.media.released(), 1);
    assert_eq!(fixture.sink.frames().await.len(), 2);
}
