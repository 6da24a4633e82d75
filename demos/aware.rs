use std::sync::{Arc, Mutex};

use weft_ioc::{Container, ContainerAware, Definition};

// An event bus that needs to reach back into the registry that owns it, so
// handlers it dispatches to can be looked up lazily by name.
#[derive(Default)]
struct EventBus {
  registry: Mutex<Option<Container>>,
}

impl EventBus {
  fn dispatch(&self, topic: &str) -> String {
    let registry = self.registry.lock().unwrap();
    let registry = registry.as_ref().expect("bus resolved outside a container");
    match registry.get_as::<String>(&format!("handler.{}", topic)) {
      Ok(handler) => format!("dispatched {:?} to {}", topic, handler),
      Err(_) => format!("no handler for {:?}", topic),
    }
  }
}

impl ContainerAware for EventBus {
  fn set_container(&self, container: Container) {
    *self.registry.lock().unwrap() = Some(container);
  }
}

fn main() {
  let registry = Container::new();

  // The aware registration head records the capability; plain `set` would
  // leave the bus unaware.
  registry
    .set_shared("bus", Definition::aware_factory(|_c, _a| EventBus::default()))
    .unwrap();

  registry
    .set("handler.greet", Definition::instance("the greeting handler".to_string()))
    .unwrap();

  // Resolution hands the bus a handle to this registry before we see it.
  let bus: Arc<EventBus> = registry.get_as("bus").unwrap();

  println!("{}", bus.dispatch("greet"));
  println!("{}", bus.dispatch("shutdown"));

  // Handlers registered after the bus was built are still found, because
  // the bus holds the registry, not a snapshot of it.
  registry
    .set("handler.shutdown", Definition::instance("the shutdown handler".to_string()))
    .unwrap();
  println!("{}", bus.dispatch("shutdown"));
}
