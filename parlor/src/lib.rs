pub use parlor_core::model::{Frame, ParticipantId, RoomId, Subject};

pub mod model {
    pub use parlor_core::model::*;
}

pub mod client {
    pub use parlor_client::*;
}
