use std::{fmt::Display, sync::Arc};

use crate::{EventType, ListenerType};

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("No listener factory registered for '{0}'")]
    UnknownListener(ListenerType),

    #[error("Listener expected an event of type '{expected}', got '{actual}'")]
    UnexpectedEvent {
        expected: EventType,
        actual: EventType,
    },

    #[error("Error external to Herald occured: {0}")]
    External(Arc<str>),
}

impl Error {
    /// Wraps an error raised by user code (a listener or a listener factory).
    pub fn external(err: impl Display) -> Self {
        Error::External(err.to_string().into())
    }
}
