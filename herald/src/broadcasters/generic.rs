use std::{
    borrow::Cow,
    cell::{Cell, RefCell},
    collections::{HashMap, hash_map::Entry},
    fmt,
    rc::Rc,
};

use crate::{
    Broadcaster, Config, Event, EventType, ListenerFactories, ListenerRef, RegistrationPolicy,
    Result,
};

/// The default broadcaster: delivers events to listeners in-process.
///
/// Listeners are kept per [`EventType`], in registration order, duplicates
/// included. On [`broadcast`](Broadcaster::broadcast) every listener
/// registered under the event's type is called once per registration:
///
/// - [`ListenerRef::Live`] listeners are called directly.
/// - [`ListenerRef::Deferred`] listeners are built through the broadcaster's
///   [`ListenerFactories`] right before the call, and dropped after it.
///
/// Dispatch works on a snapshot of the listener list, so a listener may add
/// listeners while it runs; they take part from the next broadcast on. No
/// borrow is held while a listener runs, so it may broadcast again, including
/// to itself.
///
/// # Examples
///
/// ```rust
/// use std::rc::Rc;
/// use herald::{Broadcaster, Emitter, Event, EventTag, GenericBroadcaster, ListenerRef};
///
/// #[derive(Event)]
/// struct Flagged {
///     flag: bool,
/// }
///
/// let broadcaster = Rc::new(GenericBroadcaster::new());
/// broadcaster.add_listener(
///     Flagged::EVENT_TYPE,
///     ListenerRef::from_fn(|e: &mut Flagged| {
///         e.flag = true;
///         Ok(())
///     }),
/// );
///
/// let mut emitter = Emitter::new();
/// emitter.register_broadcaster(broadcaster);
///
/// let mut event = Flagged { flag: false };
/// emitter.emit(&mut event).unwrap();
/// assert!(event.flag);
/// ```
pub struct GenericBroadcaster {
    config: Config,
    listeners: RefCell<HashMap<EventType, Vec<ListenerRef>>>,
    factories: Rc<ListenerFactories>,
    frozen: Cell<bool>,
}

impl GenericBroadcaster {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            listeners: RefCell::new(HashMap::new()),
            factories: Rc::new(ListenerFactories::new()),
            frozen: Cell::new(false),
        }
    }

    /// Resolve deferred listeners through `factories`, possibly shared with
    /// other broadcasters.
    pub fn with_factories(mut self, factories: Rc<ListenerFactories>) -> Self {
        self.factories = factories;
        self
    }

    /// Construction table used for [`ListenerRef::Deferred`] entries.
    pub fn factories(&self) -> &ListenerFactories {
        &self.factories
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Refuse all further registrations. Existing listeners keep receiving events.
    pub fn freeze(&self) {
        self.frozen.set(true);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    /// Number of registrations under `event_type`, duplicates included.
    pub fn listener_count(&self, event_type: &EventType) -> usize {
        self.listeners
            .borrow()
            .get(event_type)
            .map_or(0, Vec::len)
    }

    /// Listeners registered under `event_type`, in registration order.
    pub fn listeners(&self, event_type: &EventType) -> Vec<ListenerRef> {
        self.listeners
            .borrow()
            .get(event_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Event types with at least one listener, sorted.
    pub fn event_types(&self) -> Vec<EventType> {
        let mut types: Vec<_> = self.listeners.borrow().keys().cloned().collect();
        types.sort();
        types
    }

    fn dispatch(&self, listener: &ListenerRef, event: &mut dyn Event) -> Result<()> {
        match listener {
            ListenerRef::Live(listener) => listener.handle(event),
            ListenerRef::Deferred(listener_type) => {
                self.factories.instantiate(listener_type)?.handle(event)
            }
        }
    }
}

impl Broadcaster for GenericBroadcaster {
    fn add_listener(&self, event_type: EventType, listener: ListenerRef) -> bool {
        if self.frozen.get() {
            tracing::warn!(event = %event_type, "Broadcaster is frozen, listener rejected");
            return false;
        }

        let mut listeners = self.listeners.borrow_mut();
        match (self.config.registration, listeners.entry(event_type)) {
            (RegistrationPolicy::RejectExisting, Entry::Occupied(entry)) => {
                tracing::debug!(event = %entry.key(), "Event type already has a listener, rejected");
                false
            }
            (_, entry) => {
                tracing::debug!(event = %entry.key(), ?listener, "Listener added");
                entry.or_default().push(listener);
                true
            }
        }
    }

    fn broadcast(&self, event: &mut dyn Event) -> Result<()> {
        let event_type = event.event_type();
        let Some(listeners) = self.listeners.borrow().get(&event_type).cloned() else {
            tracing::trace!(event = %event_type, "No listeners");
            return Ok(());
        };

        tracing::trace!(event = %event_type, listeners = listeners.len(), "Broadcasting");
        for listener in &listeners {
            self.dispatch(listener, event)?;
        }
        Ok(())
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("generic")
    }
}

impl Default for GenericBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GenericBroadcaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericBroadcaster")
            .field("config", &self.config)
            .field("event_types", &self.event_types())
            .field("frozen", &self.frozen.get())
            .finish()
    }
}
