mod envelope;
mod peer;
mod room;
mod signaling;

pub use envelope::{Envelope, EnvelopeError};
pub use peer::PeerId;
pub use room::RoomId;
pub use signaling::{Inbound, ServerSignal, SignalKind};
