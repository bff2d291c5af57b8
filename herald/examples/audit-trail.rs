//! Deferred listeners next to a logging broadcaster.
//!
//! The audit listener is registered by name only and built anew for every
//! event, while the log broadcaster traces each emitted event type.
//!
//! Run with `cargo run --example audit-trail`.

use std::{cell::RefCell, rc::Rc};

use herald::*;

#[derive(Event, Debug)]
#[event(name = "account.opened")]
struct AccountOpened {
    owner: String,
    audited: u32,
}

#[derive(Event, Debug)]
#[event(name = "account.closed")]
struct AccountClosed {
    owner: String,
    audited: u32,
}

#[derive(Default)]
struct AuditListener {
    entries: RefCell<Vec<String>>,
}

impl Listener for AuditListener {
    fn handle(&self, event: &mut dyn Event) -> Result<()> {
        let entry = if let Some(e) = event.downcast_mut::<AccountOpened>() {
            e.audited += 1;
            format!("opened by {}", e.owner)
        } else if let Some(e) = event.downcast_mut::<AccountClosed>() {
            e.audited += 1;
            format!("closed by {}", e.owner)
        } else {
            return Err(Error::external(format!(
                "audit listener cannot handle {}",
                event.event_type()
            )));
        };
        println!("audit: {entry}");
        let mut entries = self.entries.borrow_mut();
        entries.push(entry);
        // always 1: deferred listeners are built for every delivery
        println!("entries in this instance: {}", entries.len());
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let generic = Rc::new(GenericBroadcaster::new());
    generic.factories().register_default::<AuditListener>("audit");

    let mut emitter = Emitter::new();
    emitter.register_broadcaster(generic.clone());
    emitter.register_broadcaster(Rc::new(LogBroadcaster::new(Rc::new(TracingLogger))));

    // Registering the same instance again is a no-op
    assert!(!emitter.register_broadcaster(generic));

    emitter.add_listener(AccountOpened::EVENT_TYPE, ListenerRef::deferred("audit"));
    emitter.add_listener(AccountClosed::EVENT_TYPE, ListenerRef::deferred("audit"));

    let mut opened = AccountOpened {
        owner: "alice".into(),
        audited: 0,
    };
    let mut closed = AccountClosed {
        owner: "alice".into(),
        audited: 0,
    };
    emitter.emit(&mut opened)?;
    emitter.emit(&mut closed)?;

    println!("{opened:?}");
    println!("{closed:?}");
    Ok(())
}
