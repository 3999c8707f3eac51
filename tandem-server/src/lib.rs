mod identity;
mod liveness;
mod registry;
mod relay;
mod room;
mod signaling;
mod transport;

pub use identity::*;
pub use liveness::*;
pub use registry::*;
pub use relay::*;
pub use room::*;
pub use signaling::*;
pub use transport::*;
