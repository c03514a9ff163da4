mod peer_sink;
mod signaling_service;
mod ws_handler;

pub use peer_sink::*;
pub use signaling_service::*;
pub use ws_handler::*;
