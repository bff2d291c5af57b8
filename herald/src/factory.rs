use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{Error, Listener, ListenerType, Result};

type Factory = Rc<dyn Fn() -> Result<Box<dyn Listener>>>;

/// Construction table for deferred listeners.
///
/// Maps a [`ListenerType`] to a zero-argument constructor. A
/// [`GenericBroadcaster`](crate::GenericBroadcaster) consults it every time
/// it dispatches to a [`ListenerRef::Deferred`](crate::ListenerRef::Deferred)
/// entry, so each delivery gets a brand new listener.
///
/// The table can be shared between several broadcasters (`Rc<ListenerFactories>`)
/// and extended after it has been handed out.
///
/// # Examples
///
/// ```rust
/// use herald::{Event, Listener, ListenerFactories, Result};
///
/// #[derive(Default)]
/// struct AuditListener;
///
/// impl Listener for AuditListener {
///     fn handle(&self, _event: &mut dyn Event) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let factories = ListenerFactories::new();
/// factories.register_default::<AuditListener>("audit");
/// assert!(factories.contains(&"audit".into()));
/// assert!(factories.instantiate(&"audit".into()).is_ok());
/// ```
#[derive(Default)]
pub struct ListenerFactories {
    factories: RefCell<HashMap<ListenerType, Factory>>,
}

impl ListenerFactories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `listener_type`, replacing any previous one.
    ///
    /// Errors returned by `factory` surface as dispatch errors.
    pub fn register<L, F>(&self, listener_type: impl Into<ListenerType>, factory: F)
    where
        L: Listener,
        F: Fn() -> Result<L> + 'static,
    {
        let listener_type = listener_type.into();
        tracing::debug!(listener = %listener_type, "Listener factory registered");
        let factory: Factory = Rc::new(move || {
            let listener = factory()?;
            Ok(Box::new(listener) as Box<dyn Listener>)
        });
        self.factories.borrow_mut().insert(listener_type, factory);
    }

    /// Register `L::default` under `listener_type`.
    pub fn register_default<L>(&self, listener_type: impl Into<ListenerType>)
    where
        L: Listener + Default,
    {
        self.register(listener_type, || Ok(L::default()));
    }

    pub fn contains(&self, listener_type: &ListenerType) -> bool {
        self.factories.borrow().contains_key(listener_type)
    }

    pub fn len(&self) -> usize {
        self.factories.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.borrow().is_empty()
    }

    /// Build a fresh instance of `listener_type`.
    pub fn instantiate(&self, listener_type: &ListenerType) -> Result<Box<dyn Listener>> {
        // Release the table before running user code, a factory may register more factories.
        let factory = self
            .factories
            .borrow()
            .get(listener_type)
            .cloned()
            .ok_or_else(|| Error::UnknownListener(listener_type.clone()))?;
        factory()
    }
}

impl fmt::Debug for ListenerFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let factories = self.factories.borrow();
        let mut names: Vec<_> = factories.keys().collect();
        names.sort();
        f.debug_struct("ListenerFactories")
            .field("listeners", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::Event;

    #[derive(Default)]
    struct Noop;

    impl Listener for Noop {
        fn handle(&self, _event: &mut dyn Event) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unknown_listener() {
        let factories = ListenerFactories::new();
        let err = factories.instantiate(&"missing".into()).err().unwrap();
        assert!(matches!(err, Error::UnknownListener(ref t) if t.as_str() == "missing"));
    }

    #[test]
    fn test_each_instantiation_calls_factory() {
        let calls = Rc::new(Cell::new(0));
        let factories = ListenerFactories::new();
        let counter = calls.clone();
        factories.register("noop", move || {
            counter.set(counter.get() + 1);
            Ok(Noop)
        });

        assert!(factories.instantiate(&"noop".into()).is_ok());
        assert!(factories.instantiate(&"noop".into()).is_ok());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_factory_error_is_returned() {
        let factories = ListenerFactories::new();
        factories.register::<Noop, _>("broken", || Err(Error::external("no database")));
        let err = factories.instantiate(&"broken".into()).err().unwrap();
        assert!(matches!(err, Error::External(_)));
    }

    #[test]
    fn test_register_replaces_previous() {
        let factories = ListenerFactories::new();
        factories.register::<Noop, _>("noop", || Err(Error::external("old")));
        factories.register_default::<Noop>("noop");
        assert_eq!(factories.len(), 1);
        assert!(factories.instantiate(&"noop".into()).is_ok());
        assert_eq!(format!("{factories:?}"), "ListenerFactories { listeners: [ListenerType(\"noop\")] }");
    }
}
