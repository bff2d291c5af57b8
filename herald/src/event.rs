use std::{any::Any, borrow::Borrow, borrow::Cow, fmt};

/// Stable routing key of an event type.
///
/// Broadcasters map `EventType`s to listeners. The value is chosen when the
/// event type is defined (see [`EventTag`]) rather than discovered through
/// reflection, so the same type always routes under the same key.
///
/// `#[derive(Event)]` uses the fully qualified type path
/// (e.g. `"my_app::orders::OrderPlaced"`), unless overridden with
/// `#[event(name = "...")]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct EventType(Cow<'static, str>);

impl EventType {
    /// Usable in `const` context, which is how [`EventTag::EVENT_TYPE`] is built.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Routing key of the event type `E`.
    pub fn of<E: EventTag>() -> Self {
        E::EVENT_TYPE
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EventType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EventType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for EventType {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl PartialEq<str> for EventType {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EventType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Upcast helper so `dyn Event` can be downcast to its concrete type.
///
/// Implemented for every `'static` type; there is no need to implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Marker trait for values that can be emitted.
///
/// The trait is dyn-compatible: broadcasters and listeners receive
/// `&mut dyn Event`, so a single broadcaster can carry any event type while
/// functions can still say "this only accepts events".
///
/// The only information the dispatch mechanism reads is [`event_type`](Event::event_type).
/// Events are never modified by Herald itself, though listeners may modify them.
///
/// Usually derived:
///
/// ```rust
/// use herald::{Event, EventTag};
///
/// #[derive(Event)]
/// struct UserRegistered {
///     user_id: u64,
/// }
///
/// #[derive(Event)]
/// #[event(name = "order.completed")]
/// struct OrderCompleted;
///
/// assert!(UserRegistered::EVENT_TYPE.as_str().ends_with("::UserRegistered"));
/// assert_eq!(OrderCompleted::EVENT_TYPE, "order.completed");
/// ```
///
/// The derive accepts a single `name` key, which must not be empty:
///
/// ```compile_fail
/// #[derive(herald::Event)]
/// #[event(name = "")]
/// struct Unnamed;
/// ```
///
/// ```compile_fail
/// #[derive(herald::Event)]
/// #[event(topic = "orders")]
/// struct Misspelled;
/// ```
pub trait Event: AsAny + 'static {
    /// Routing key under which listeners for this event are registered.
    fn event_type(&self) -> EventType;
}

/// Compile-time routing key of a concrete event type.
///
/// Lets callers name the key without an event instance, e.g. when
/// registering listeners. `Event::event_type` of a tagged type must return
/// `EVENT_TYPE`; the derive macro guarantees this.
pub trait EventTag: Event + Sized {
    const EVENT_TYPE: EventType;
}

impl dyn Event {
    /// Returns `true` if the event is of type `E`.
    pub fn is<E: Event>(&self) -> bool {
        self.as_any().is::<E>()
    }

    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }

    pub fn downcast_mut<E: Event>(&mut self) -> Option<&mut E> {
        self.as_any_mut().downcast_mut::<E>()
    }
}

impl fmt::Debug for dyn Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Event").field(&self.event_type()).finish()
    }
}
