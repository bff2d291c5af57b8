use std::fmt;

use crate::{
    Event, EventTag, EventType, ListenerRef, Result, SharedBroadcaster, broadcaster::same_instance,
};

/// Entry point of the event system: fans events and listener registrations
/// out to every registered [`Broadcaster`](crate::Broadcaster).
///
/// - Register broadcasters with [`register_broadcaster`](Emitter::register_broadcaster).
///   The same instance is accepted only once.
/// - Add listeners on all broadcasters at once with [`add_listener`](Emitter::add_listener),
///   or on one broadcaster directly.
/// - [`emit`](Emitter::emit) hands the event to each broadcaster in registration order.
///
/// Everything runs synchronously on the caller's stack. There is no
/// isolation: the first error raised by a broadcaster (i.e. by one of its
/// listeners) stops the emission and is returned to the caller.
///
/// # Examples
///
/// ```rust
/// use std::rc::Rc;
/// use herald::{Emitter, Event, GenericBroadcaster};
///
/// #[derive(Event)]
/// struct OrderPlaced {
///     total: u32,
///     confirmed: bool,
/// }
///
/// let mut emitter = Emitter::new();
/// assert!(emitter.register_broadcaster(Rc::new(GenericBroadcaster::new())));
///
/// emitter.listen(|order: &mut OrderPlaced| {
///     order.confirmed = order.total > 0;
///     Ok(())
/// });
///
/// let mut order = OrderPlaced { total: 42, confirmed: false };
/// emitter.emit(&mut order)?;
/// assert!(order.confirmed);
/// # Ok::<(), herald::Error>(())
/// ```
#[derive(Default)]
pub struct Emitter {
    broadcasters: Vec<SharedBroadcaster>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered broadcasters, in registration order.
    pub fn broadcasters(&self) -> &[SharedBroadcaster] {
        &self.broadcasters
    }

    pub fn len(&self) -> usize {
        self.broadcasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.broadcasters.is_empty()
    }

    /// Add a broadcaster to emit events to.
    ///
    /// Returns `false`, leaving the emitter unchanged, if this very instance
    /// is already registered. Instances are compared by address, so two
    /// separately created broadcasters are both accepted even when they are
    /// configured identically.
    pub fn register_broadcaster(&mut self, broadcaster: SharedBroadcaster) -> bool {
        if self
            .broadcasters
            .iter()
            .any(|b| same_instance(b, &broadcaster))
        {
            tracing::debug!(broadcaster = %broadcaster.name(), "Broadcaster already registered");
            return false;
        }

        tracing::debug!(
            broadcaster = %broadcaster.name(),
            position = self.broadcasters.len(),
            "Broadcaster registered"
        );
        self.broadcasters.push(broadcaster);
        true
    }

    /// Emit `event` to all registered broadcasters, in registration order.
    ///
    /// Stops at the first broadcaster returning an error; the broadcasters
    /// after it do not see the event.
    pub fn emit(&self, event: &mut dyn Event) -> Result<()> {
        tracing::trace!(
            event = %event.event_type(),
            broadcasters = self.broadcasters.len(),
            "Emitting"
        );
        for broadcaster in &self.broadcasters {
            broadcaster.broadcast(event)?;
        }
        Ok(())
    }

    /// Register `listener` under `event_type` on every broadcaster.
    ///
    /// Returns `false` when there is no broadcaster (nothing was registered,
    /// and broadcasters registered later will not see the listener), or when
    /// at least one broadcaster refused the listener. In the latter case the
    /// broadcasters that accepted it keep it.
    pub fn add_listener(&self, event_type: EventType, listener: ListenerRef) -> bool {
        if self.broadcasters.is_empty() {
            tracing::debug!(event = %event_type, "No broadcasters, listener dropped");
            return false;
        }

        let mut accepted = true;
        for broadcaster in &self.broadcasters {
            if !broadcaster.add_listener(event_type.clone(), listener.clone()) {
                tracing::debug!(
                    event = %event_type,
                    broadcaster = %broadcaster.name(),
                    "Listener refused"
                );
                accepted = false;
            }
        }
        accepted
    }

    /// Register a closure for events of type `E` on every broadcaster.
    ///
    /// All broadcasters share the same closure instance.
    /// Same return value as [`add_listener`](Emitter::add_listener).
    pub fn listen<E, F>(&self, f: F) -> bool
    where
        E: EventTag,
        F: Fn(&mut E) -> Result<()> + 'static,
    {
        self.add_listener(E::EVENT_TYPE, ListenerRef::from_fn(f))
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.broadcasters.iter().map(|b| b.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        Broadcaster, Config, Error, GenericBroadcaster, LINE_ENDING, LogBroadcaster,
        MemoryLogger, RegistrationPolicy,
    };

    struct Flag {
        flag: bool,
    }

    impl Event for Flag {
        fn event_type(&self) -> EventType {
            Self::EVENT_TYPE
        }
    }

    impl EventTag for Flag {
        const EVENT_TYPE: EventType = EventType::from_static("tests::Flag");
    }

    /// Broadcaster recording the order in which it was reached.
    struct Tracker {
        id: &'static str,
        trail: Rc<RefCell<Vec<&'static str>>>,
        accept: bool,
        fail: bool,
    }

    impl Tracker {
        fn new(id: &'static str, trail: &Rc<RefCell<Vec<&'static str>>>) -> Self {
            Self {
                id,
                trail: trail.clone(),
                accept: true,
                fail: false,
            }
        }
    }

    impl Broadcaster for Tracker {
        fn add_listener(&self, _event_type: EventType, _listener: ListenerRef) -> bool {
            self.trail.borrow_mut().push(self.id);
            self.accept
        }

        fn broadcast(&self, _event: &mut dyn Event) -> Result<()> {
            self.trail.borrow_mut().push(self.id);
            if self.fail {
                return Err(Error::external(self.id));
            }
            Ok(())
        }
    }

    #[test]
    fn test_get_broadcasters() {
        let mut emitter = Emitter::new();
        assert!(emitter.is_empty());
        emitter.register_broadcaster(Rc::new(GenericBroadcaster::new()));
        assert_eq!(emitter.broadcasters().len(), 1);
        assert_eq!(emitter.len(), 1);
    }

    #[test]
    fn test_register_same_instance_once() {
        let mut emitter = Emitter::new();
        let broadcaster: SharedBroadcaster = Rc::new(GenericBroadcaster::new());
        assert!(emitter.register_broadcaster(broadcaster.clone()));
        assert!(!emitter.register_broadcaster(broadcaster.clone()));
        assert!(!emitter.register_broadcaster(broadcaster));
        assert_eq!(emitter.len(), 1);
    }

    #[test]
    fn test_equal_but_distinct_instances_coexist() {
        let mut emitter = Emitter::new();
        assert!(emitter.register_broadcaster(Rc::new(GenericBroadcaster::new())));
        assert!(emitter.register_broadcaster(Rc::new(GenericBroadcaster::new())));
        assert_eq!(emitter.len(), 2);
    }

    #[test]
    fn test_concrete_and_erased_handles_are_the_same_instance() {
        let mut emitter = Emitter::new();
        let broadcaster = Rc::new(GenericBroadcaster::new());
        assert!(emitter.register_broadcaster(broadcaster.clone()));
        assert!(!emitter.register_broadcaster(broadcaster.clone() as SharedBroadcaster));
        // the creator keeps its own typed handle
        assert!(broadcaster.add_listener(Flag::EVENT_TYPE, ListenerRef::deferred("x")));
    }

    #[test]
    fn test_add_listener_without_broadcasters() {
        let mut emitter = Emitter::new();
        assert!(!emitter.listen(|e: &mut Flag| {
            e.flag = true;
            Ok(())
        }));

        let broadcaster = Rc::new(GenericBroadcaster::new());
        emitter.register_broadcaster(broadcaster.clone());
        assert_eq!(broadcaster.listener_count(&Flag::EVENT_TYPE), 0);

        let mut event = Flag { flag: false };
        emitter.emit(&mut event).unwrap();
        assert!(!event.flag);
    }

    #[test]
    fn test_add_listener_appends_by_default() {
        let mut emitter = Emitter::new();
        emitter.register_broadcaster(Rc::new(GenericBroadcaster::new()));
        assert!(emitter.add_listener(Flag::EVENT_TYPE, ListenerRef::deferred("a")));
        assert!(emitter.add_listener(Flag::EVENT_TYPE, ListenerRef::deferred("a")));
    }

    #[test]
    fn test_add_listener_reports_refusal_without_rollback() {
        let mut emitter = Emitter::new();
        let rejecting = Rc::new(GenericBroadcaster::with_config(
            Config::default().with_registration(RegistrationPolicy::RejectExisting),
        ));
        let appending = Rc::new(GenericBroadcaster::new());
        emitter.register_broadcaster(rejecting.clone());
        emitter.register_broadcaster(appending.clone());

        assert!(emitter.add_listener(Flag::EVENT_TYPE, ListenerRef::deferred("a")));
        assert!(!emitter.add_listener(Flag::EVENT_TYPE, ListenerRef::deferred("b")));
        assert_eq!(rejecting.listener_count(&Flag::EVENT_TYPE), 1);
        assert_eq!(appending.listener_count(&Flag::EVENT_TYPE), 2);
    }

    #[test]
    fn test_add_listener_reaches_all_broadcasters_after_refusal() {
        let trail = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new();
        let mut refusing = Tracker::new("refusing", &trail);
        refusing.accept = false;
        emitter.register_broadcaster(Rc::new(refusing));
        emitter.register_broadcaster(Rc::new(Tracker::new("accepting", &trail)));

        assert!(!emitter.add_listener(Flag::EVENT_TYPE, ListenerRef::deferred("a")));
        assert_eq!(*trail.borrow(), vec!["refusing", "accepting"]);
    }

    #[test]
    fn test_emit_in_registration_order() {
        let trail = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new();
        for id in ["one", "two", "three"] {
            emitter.register_broadcaster(Rc::new(Tracker::new(id, &trail)));
        }

        emitter.emit(&mut Flag { flag: false }).unwrap();
        assert_eq!(*trail.borrow(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_emit_stops_at_first_failure() {
        let trail = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new();
        let mut failing = Tracker::new("failing", &trail);
        failing.fail = true;
        emitter.register_broadcaster(Rc::new(Tracker::new("first", &trail)));
        emitter.register_broadcaster(Rc::new(failing));
        emitter.register_broadcaster(Rc::new(Tracker::new("skipped", &trail)));

        let err = emitter.emit(&mut Flag { flag: false }).unwrap_err();
        assert!(matches!(err, Error::External(ref id) if &**id == "failing"));
        assert_eq!(*trail.borrow(), vec!["first", "failing"]);
    }

    #[test]
    fn test_emit_without_broadcasters() {
        assert!(Emitter::new().emit(&mut Flag { flag: false }).is_ok());
    }

    #[test]
    fn test_listener_shared_across_broadcasters() {
        let logger = Rc::new(MemoryLogger::new());
        let mut emitter = Emitter::new();
        let generic = Rc::new(GenericBroadcaster::new());
        let log = Rc::new(LogBroadcaster::new(logger.clone()));
        emitter.register_broadcaster(generic.clone());
        emitter.register_broadcaster(log.clone());

        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        assert!(emitter.listen(move |_: &mut Flag| {
            *counter.borrow_mut() += 1;
            Ok(())
        }));
        assert_eq!(generic.listener_count(&Flag::EVENT_TYPE), 1);
        assert_eq!(log.listener_count(&Flag::EVENT_TYPE), 1);

        emitter.emit(&mut Flag { flag: false }).unwrap();
        assert_eq!(*count.borrow(), 1);
        assert_eq!(logger.data(), format!("tests::Flag{LINE_ENDING}"));
    }

    #[test]
    fn test_debug_lists_broadcaster_names() {
        let mut emitter = Emitter::new();
        emitter.register_broadcaster(Rc::new(GenericBroadcaster::new()));
        emitter.register_broadcaster(Rc::new(LogBroadcaster::new(Rc::new(MemoryLogger::new()))));
        assert_eq!(format!("{emitter:?}"), r#"["generic", "log"]"#);
    }
}
