mod relay;
mod relay_command;
mod router;

pub use relay::*;
pub use relay_command::*;
pub use router::*;
