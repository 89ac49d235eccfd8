use crate::integration::{create_call_session, init_tracing, next_frame, wait_for_status};
use crate::utils::PeerOp;
use parlor_client::{CallCommand, CallPhase, PeerConnectionState, PeerEvent};
use parlor_core::{IceCandidate, SessionDescription};

/// Full responder path: a queued candidate, then the remote offer, then the
/// transport reporting connected.
#[tokio::test]
async fn test_responder_answers_offer() {
    init_tracing();

    let mut fixture = create_call_session();
    let commands = fixture.handle.commands();

    // ICE can outrun the offer on a shared channel.
    let early = IceCandidate::new("candidate:0 before-offer");
    commands
        .send(CallCommand::RemoteIce(early.clone()))
        .await
        .unwrap();

    commands
        .send(CallCommand::RemoteOffer(SessionDescription::offer(
            "remote-offer-sdp",
        )))
        .await
        .unwrap();

    let frame = next_frame(&mut fixture.frames).await;
    assert_eq!(frame.subject, "webrtc.answer.r1");
    assert_eq!(frame.payload["type"], "answer");

    let mut status = fixture.handle.status();
    wait_for_status(&mut status, |s| s.phase == CallPhase::AnswerSent, "AnswerSent").await;

    let ops = fixture.connector.handle().ops().await;
    let expected_start = [
        PeerOp::RemoteDescriptionSet(SessionDescription::offer("remote-offer-sdp")),
        PeerOp::CandidateAdded(early),
    ];
    assert_eq!(&ops[..2], &expected_start);
    assert!(ops.contains(&PeerOp::AnswerCreated));

    // The responder reaches Connected via the transport, not via a frame.
    fixture
        .connector
        .emit(PeerEvent::ConnectionStateChanged(
            PeerConnectionState::Connected,
        ))
        .await;
    wait_for_status(&mut status, |s| s.phase == CallPhase::Connected, "Connected").await;
}
