use std::{borrow::Cow, cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{Broadcaster, Event, EventType, ListenerRef, Logger, Result};

/// Diagnostic broadcaster writing the type of every event to a logger.
///
/// It does nothing with the events themselves and never calls listeners.
/// Register it next to a functional broadcaster to get a trace of what
/// was emitted:
///
/// ```rust
/// use std::rc::Rc;
/// use herald::{Emitter, Event, EventTag, GenericBroadcaster, LogBroadcaster, MemoryLogger};
///
/// #[derive(Event)]
/// #[event(name = "user.login")]
/// struct Login;
///
/// let logger = Rc::new(MemoryLogger::new());
/// let mut emitter = Emitter::new();
/// emitter.register_broadcaster(Rc::new(GenericBroadcaster::new()));
/// emitter.register_broadcaster(Rc::new(LogBroadcaster::new(logger.clone())));
///
/// emitter.emit(&mut Login).unwrap();
/// assert_eq!(logger.lines(), vec!["user.login"]);
/// ```
///
/// Listeners added to it are kept, so it can take part in
/// [`Emitter::add_listener`](crate::Emitter::add_listener), but they have no
/// influence on what gets logged.
pub struct LogBroadcaster {
    logger: Rc<dyn Logger>,
    listeners: RefCell<HashMap<EventType, Vec<ListenerRef>>>,
}

impl LogBroadcaster {
    pub fn new(logger: Rc<dyn Logger>) -> Self {
        Self {
            logger,
            listeners: RefCell::new(HashMap::new()),
        }
    }

    pub fn listener_count(&self, event_type: &EventType) -> usize {
        self.listeners
            .borrow()
            .get(event_type)
            .map_or(0, Vec::len)
    }
}

impl Broadcaster for LogBroadcaster {
    fn add_listener(&self, event_type: EventType, listener: ListenerRef) -> bool {
        self.listeners
            .borrow_mut()
            .entry(event_type)
            .or_default()
            .push(listener);
        true
    }

    fn broadcast(&self, event: &mut dyn Event) -> Result<()> {
        self.logger.info(event.event_type().as_str());
        Ok(())
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("log")
    }
}

impl fmt::Debug for LogBroadcaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogBroadcaster")
            .field("listeners", &self.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}
