mod generic;
mod log;

pub use generic::GenericBroadcaster;
pub use log::LogBroadcaster;
