mod peer_registry;
mod room_registry;

pub use peer_registry::*;
pub use room_registry::*;
