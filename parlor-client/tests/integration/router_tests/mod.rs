mod test_malformed_subject_discarded;
mod test_room_mismatch_discarded;
mod test_stream_frame_for_other_participant_ignored;
mod test_webrtc_echo_suppressed;
