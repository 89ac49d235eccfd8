use parlor_core::{ParticipantId, RoomId};

/// Identity of one room visit, fixed at join time and passed explicitly into
/// every component that needs it.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub room: RoomId,
    pub participant: ParticipantId,
    pub display_name: String,
}

impl SessionContext {
    pub fn new(
        room: impl Into<RoomId>,
        participant: impl Into<ParticipantId>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            room: room.into(),
            participant: participant.into(),
            display_name: display_name.into(),
        }
    }
}
