use std::{borrow::Cow, rc::Rc};

use crate::{Event, EventType, ListenerRef, Result};

/// A delivery strategy: keeps its own event type → listeners mapping and
/// decides how an event reaches them.
///
/// Implementations shipped with Herald:
/// - [`GenericBroadcaster`](crate::GenericBroadcaster): calls the matching
///   listeners in-process.
/// - [`LogBroadcaster`](crate::LogBroadcaster): writes the event type to a
///   logger and ignores listeners.
///
/// New strategies plug into an [`Emitter`](crate::Emitter) without changes to it.
/// Both methods take `&self`, since a broadcaster is shared between the emitter
/// and the code that created it; implementations keep their state in a `RefCell`.
pub trait Broadcaster {
    /// Register `listener` under `event_type`.
    ///
    /// Listeners accumulate: a second listener for the same event type is
    /// appended, not rejected. Return `false` only when the broadcaster cannot
    /// take registrations at all (for instance because it was frozen).
    fn add_listener(&self, event_type: EventType, listener: ListenerRef) -> bool;

    /// Deliver `event` to the listeners registered under its event type, in
    /// registration order.
    ///
    /// Having no listeners for the event type is not an error. The first error
    /// raised by a listener aborts the dispatch and is returned as is.
    fn broadcast(&self, event: &mut dyn Event) -> Result<()>;

    /// Name used in diagnostics.
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}

/// A broadcaster shared between an [`Emitter`](crate::Emitter) and its creator.
pub type SharedBroadcaster = Rc<dyn Broadcaster>;

/// Returns `true` if both handles point at the same broadcaster instance.
///
/// Only the address is compared. Two broadcasters holding identical
/// listeners are still different broadcasters.
#[inline]
pub(crate) fn same_instance(a: &SharedBroadcaster, b: &SharedBroadcaster) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
