use std::sync::Arc;

use weft_ioc::{Container, Error, Instance};

fn main() {
  let registry = Container::new();

  // --- A locked registration ---
  // Infrastructure that nothing should be able to swap out later.
  registry
    .set_shared_locked("engine", Instance::new("v8 flux drive".to_string()))
    .unwrap();
  println!("registered a locked engine");

  // --- Replacement is refused ---
  match registry.set("engine", Instance::new("bargain drive".to_string())) {
    Err(Error::Locked(name)) => println!("replacement refused: service {:?} is locked", name),
    other => panic!("expected a lock error, got {:?}", other),
  }

  // --- Removal is refused too ---
  match registry.remove("engine") {
    Err(Error::RemoveLocked(name)) => println!("removal refused: service {:?} is locked", name),
    other => panic!("expected a lock error, got {:?}", other),
  }

  // --- Resolution is unaffected ---
  let engine: Arc<String> = registry.get_as("engine").unwrap();
  println!("the engine still resolves: {}", engine);

  // --- Unlocked names keep their flexibility ---
  registry
    .set("cabin-lights", Instance::new("warm white".to_string()))
    .unwrap();
  registry
    .set("cabin-lights", Instance::new("cool blue".to_string()))
    .unwrap();
  let lights: Arc<String> = registry.get_as("cabin-lights").unwrap();
  println!("cabin lights swapped freely: {}", lights);

  registry.remove("cabin-lights").unwrap();
  println!("and removed again; registered: {:?}", registry.names());
}
