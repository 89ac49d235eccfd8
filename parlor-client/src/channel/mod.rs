mod frame_sink;
mod ws_channel;

pub use frame_sink::FrameSink;
pub use ws_channel::{ChannelStatus, SignalingChannel};
