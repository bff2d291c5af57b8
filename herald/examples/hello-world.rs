use std::rc::Rc;

use herald::*;

// Define your events
#[derive(Event)]
struct Hello {
    name: String,
    greeted: bool,
}

// Create a listener
struct Greeter;

impl Listener for Greeter {
    fn handle(&self, event: &mut dyn Event) -> Result<()> {
        if let Some(hello) = event.downcast_mut::<Hello>() {
            println!("Hello, {}!", hello.name);
            hello.greeted = true;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let mut emitter = Emitter::new();

    // Deliver events in-process
    emitter.register_broadcaster(Rc::new(GenericBroadcaster::new()));

    // Register the listener on every broadcaster
    emitter.add_listener(Hello::EVENT_TYPE, ListenerRef::live(Greeter));

    let mut event = Hello {
        name: "World".into(),
        greeted: false,
    };
    emitter.emit(&mut event)?;
    assert!(event.greeted);
    Ok(())
}
