mod stream_command;
mod stream_session;
mod stream_state;

pub use stream_command::StreamCommand;
pub use stream_session::{StreamHandle, StreamSession};
pub use stream_state::{StreamState, StreamStatus};
