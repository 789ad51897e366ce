pub mod participant;
pub mod registry;
pub mod session;

pub use participant::*;
pub use registry::*;
pub use session::*;
