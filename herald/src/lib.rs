//! Herald - synchronous in-process event emitter
//!
//! An [`Emitter`] fans every event out to a set of [`Broadcaster`]s. Each
//! broadcaster keeps its own event type → listeners mapping and decides how
//! delivery happens:
//!
//! - [`GenericBroadcaster`] calls the matching [`Listener`]s in-process,
//!   including deferred listeners built on demand by [`ListenerFactories`].
//! - [`LogBroadcaster`] writes the type of each event to a [`Logger`].
//!
//! Delivery is synchronous and fail-fast: `emit` returns once every listener
//! ran, or with the first error a listener returned.
//!
//! See `examples/hello-world.rs` and `examples/audit-trail.rs`.

extern crate self as herald;

mod broadcaster;
mod broadcasters;
mod config;
mod emitter;
mod error;
mod event;
mod factory;
mod listener;
mod logger;

pub use broadcaster::{Broadcaster, SharedBroadcaster};
pub use broadcasters::{GenericBroadcaster, LogBroadcaster};
pub use config::{Config, RegistrationPolicy};
pub use emitter::Emitter;
pub use error::Error;
pub use event::{AsAny, Event, EventTag, EventType};
pub use factory::ListenerFactories;
pub use listener::{FnListener, Listener, ListenerRef, ListenerType, SharedListener};
pub use logger::{LINE_ENDING, Logger, MemoryLogger, TracingLogger};

#[cfg(feature = "macros")]
pub use herald_macros::Event;

pub type Result<T = ()> = std::result::Result<T, Error>;
