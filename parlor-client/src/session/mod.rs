mod context;
mod room_session;

pub use context::SessionContext;
pub use room_session::{RoomSession, SessionConfig};
