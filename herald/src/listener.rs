use std::{borrow::Cow, fmt, marker::PhantomData, rc::Rc};

use crate::{Error, Event, EventTag, Result};

/// Handles events delivered by a broadcaster.
///
/// `handle` is called synchronously, on the emitter's call stack. An error
/// returned here is not caught: it stops the current dispatch and is
/// returned from [`Broadcaster::broadcast`](crate::Broadcaster::broadcast)
/// and [`Emitter::emit`](crate::Emitter::emit).
///
/// `handle` takes `&self`: a live listener may be entered again while it is
/// still running, e.g. when it emits another event it also listens to.
/// Listeners that keep state hold it in a `Cell` or `RefCell`.
///
/// Listeners receive the event as `&mut dyn Event` and may downcast it:
///
/// ```rust
/// use std::cell::Cell;
/// use herald::{Event, Listener, Result};
///
/// #[derive(Event)]
/// struct Ping {
///     seen: bool,
/// }
///
/// #[derive(Default)]
/// struct Pong {
///     count: Cell<u32>,
/// }
///
/// impl Listener for Pong {
///     fn handle(&self, event: &mut dyn Event) -> Result<()> {
///         if let Some(ping) = event.downcast_mut::<Ping>() {
///             ping.seen = true;
///             self.count.set(self.count.get() + 1);
///         }
///         Ok(())
///     }
/// }
/// ```
///
/// For listeners interested in a single event type, [`FnListener`] does the
/// downcast for you.
pub trait Listener: 'static {
    fn handle(&self, event: &mut dyn Event) -> Result<()>;
}

/// A live listener, shared between every broadcaster it is registered with.
pub type SharedListener = Rc<dyn Listener>;

/// Name of a listener type, resolved to a fresh instance by
/// [`ListenerFactories`](crate::ListenerFactories) at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ListenerType(Cow<'static, str>);

impl ListenerType {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListenerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ListenerType {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for ListenerType {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// A listener registration entry.
///
/// - `Live`: a ready-to-use instance. Every broadcast calls the same object,
///   so state kept in the listener persists across emissions.
/// - `Deferred`: only the listener's type name. It is instantiated anew,
///   through the broadcaster's factory table, every time it is dispatched to;
///   nothing is cached.
#[derive(Clone)]
pub enum ListenerRef {
    Live(SharedListener),
    Deferred(ListenerType),
}

impl ListenerRef {
    /// Wraps a listener instance.
    pub fn live<L: Listener>(listener: L) -> Self {
        ListenerRef::Live(Rc::new(listener))
    }

    /// Refers to a listener type by name.
    pub fn deferred(listener_type: impl Into<ListenerType>) -> Self {
        ListenerRef::Deferred(listener_type.into())
    }

    /// Wraps a closure handling events of type `E` only.
    pub fn from_fn<E, F>(f: F) -> Self
    where
        E: EventTag,
        F: Fn(&mut E) -> Result<()> + 'static,
    {
        Self::live(FnListener::new(f))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, ListenerRef::Deferred(_))
    }
}

impl From<SharedListener> for ListenerRef {
    fn from(listener: SharedListener) -> Self {
        ListenerRef::Live(listener)
    }
}

impl From<ListenerType> for ListenerRef {
    fn from(listener_type: ListenerType) -> Self {
        ListenerRef::Deferred(listener_type)
    }
}

impl fmt::Debug for ListenerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerRef::Live(listener) => f
                .debug_tuple("Live")
                .field(&Rc::as_ptr(listener).cast::<()>())
                .finish(),
            ListenerRef::Deferred(name) => f.debug_tuple("Deferred").field(name).finish(),
        }
    }
}

/// Listener for a single event type backed by a closure.
///
/// Receiving an event of any other type is an error
/// ([`Error::UnexpectedEvent`]), which usually means the closure was
/// registered under the wrong key. The closure is `Fn` so it can be re-entered;
/// capture a `Cell` or `RefCell` to keep state.
pub struct FnListener<E, F> {
    f: F,
    _event: PhantomData<fn(&mut E)>,
}

impl<E, F> FnListener<E, F>
where
    E: EventTag,
    F: Fn(&mut E) -> Result<()> + 'static,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _event: PhantomData,
        }
    }
}

impl<E, F> Listener for FnListener<E, F>
where
    E: EventTag,
    F: Fn(&mut E) -> Result<()> + 'static,
{
    fn handle(&self, event: &mut dyn Event) -> Result<()> {
        let actual = event.event_type();
        match event.downcast_mut::<E>() {
            Some(event) => (self.f)(event),
            None => Err(Error::UnexpectedEvent {
                expected: E::EVENT_TYPE,
                actual,
            }),
        }
    }
}
