mod call_command;
mod call_session;
mod call_state;

pub use call_command::CallCommand;
pub use call_session::{CallHandle, CallSession};
pub use call_state::{CallPhase, CallStatus};
