use crate::integration::{create_stream_session, init_tracing, settle};
use parlor_client::StreamCommand;
use parlor_core::IceCandidate;

/// Unlike the call flow, stream ICE that arrives before the server's offer
/// has no session to land in and is discarded rather than queued.
#[tokio::test]
async fn test_stream_ice_before_offer_dropped() {
    init_tracing();

    let fixture = create_stream_session();
    let commands = fixture.handle.commands();

    commands
        .send(StreamCommand::RemoteIce(IceCandidate::new("early")))
        .await
        .unwrap();
    settle().await;

    assert!(
        fixture
            .connector
            .handle()
            .candidates_added()
            .await
            .is_empty()
    );
    assert_eq!(fixture.connector.connect_count(), 0);
}
