use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use weft_ioc::{Container, ContainerAware, Definition, Instance};

// --- Test Fixtures ---

// The canonical aware fixture: stores the injected handle and counts how
// often injection happens.
#[derive(Default)]
struct Dispatcher {
  container: Mutex<Option<Container>>,
  injections: AtomicUsize,
}

impl ContainerAware for Dispatcher {
  fn set_container(&self, container: Container) {
    self.injections.fetch_add(1, Ordering::SeqCst);
    *self.container.lock().unwrap() = Some(container);
  }
}

// --- Injection Tests ---

#[test]
fn test_aware_instances_receive_the_container_on_every_get() {
  // Arrange
  let registry = Container::new();
  registry
    .set("dispatcher", Definition::aware_instance(Dispatcher::default()))
    .unwrap();

  // Act
  registry.get("dispatcher").unwrap();
  registry.get("dispatcher").unwrap();
  let dispatcher: Arc<Dispatcher> = registry.get_as("dispatcher").unwrap();

  // Assert: one injection per resolution, three so far.
  assert_eq!(dispatcher.injections.load(Ordering::SeqCst), 3);

  let injected = dispatcher.container.lock().unwrap().clone().unwrap();
  assert!(Container::ptr_eq(&injected, &registry));
}

#[test]
fn test_the_resolving_container_is_the_one_injected() {
  // One pre-built aware instance registered in two registries: each `get`
  // injects the registry that served it.
  let instance = Instance::aware(Dispatcher::default());

  let left = Container::new();
  let right = Container::new();
  left.set("dispatcher", instance.clone()).unwrap();
  right.set("dispatcher", instance.clone()).unwrap();

  let via_left: Arc<Dispatcher> = left.get_as("dispatcher").unwrap();
  let seen = via_left.container.lock().unwrap().clone().unwrap();
  assert!(Container::ptr_eq(&seen, &left));

  let via_right: Arc<Dispatcher> = right.get_as("dispatcher").unwrap();
  let seen = via_right.container.lock().unwrap().clone().unwrap();
  assert!(Container::ptr_eq(&seen, &right));

  // Both registries hold the same underlying object.
  assert!(Arc::ptr_eq(&via_left, &via_right));
}

#[test]
fn test_plain_registrations_are_never_injected() {
  // The capability is recorded at registration, not probed at `get`: a type
  // that implements `ContainerAware` but is registered through the plain
  // heads takes no part in injection.
  let registry = Container::new();
  registry
    .set("dispatcher", Instance::new(Dispatcher::default()))
    .unwrap();

  let dispatcher: Arc<Dispatcher> = registry.get_as("dispatcher").unwrap();

  assert_eq!(dispatcher.injections.load(Ordering::SeqCst), 0);
  assert!(dispatcher.container.lock().unwrap().is_none());
}

#[test]
fn test_shared_aware_services_are_built_once_but_injected_each_time() {
  static FACTORY_RUNS: AtomicUsize = AtomicUsize::new(0);

  // Arrange
  let registry = Container::new();
  registry
    .set_shared(
      "dispatcher",
      Definition::aware_factory(|_c, _a| {
        FACTORY_RUNS.fetch_add(1, Ordering::SeqCst);
        Dispatcher::default()
      }),
    )
    .unwrap();

  // Act
  registry.get("dispatcher").unwrap();
  registry.get("dispatcher").unwrap();
  let dispatcher: Arc<Dispatcher> = registry.get_as("dispatcher").unwrap();

  // Assert: the cache serves one instance, yet injection tracks every `get`.
  assert_eq!(FACTORY_RUNS.load(Ordering::SeqCst), 1);
  assert_eq!(dispatcher.injections.load(Ordering::SeqCst), 3);
}

#[test]
fn test_aware_hooks_may_resolve_sibling_services() {
  // `set_container` runs after the resolution bookkeeping is finished, so
  // the hook is free to call back into the registry.
  #[derive(Default)]
  struct Wiring {
    greeting: Mutex<Option<String>>,
  }

  impl ContainerAware for Wiring {
    fn set_container(&self, container: Container) {
      let greeting: Arc<String> = container.get_as("aware.greeting").unwrap();
      *self.greeting.lock().unwrap() = Some((*greeting).clone());
    }
  }

  // Arrange
  let registry = Container::new();
  registry
    .set_shared("aware.greeting", Instance::new("hello".to_string()))
    .unwrap();
  registry
    .set("wiring", Definition::aware_instance(Wiring::default()))
    .unwrap();

  // Act
  let wiring: Arc<Wiring> = registry.get_as("wiring").unwrap();

  // Assert
  assert_eq!(wiring.greeting.lock().unwrap().as_deref(), Some("hello"));
}

#[test]
fn test_aware_services_can_hold_a_weak_handle() {
  // A shared aware service that stores a weak handle does not keep its
  // registry alive through the cache.
  #[derive(Default)]
  struct Telemetry {
    registry: Mutex<Option<weft_ioc::WeakContainer>>,
  }

  impl ContainerAware for Telemetry {
    fn set_container(&self, container: Container) {
      *self.registry.lock().unwrap() = Some(container.downgrade());
    }
  }

  let registry = Container::new();
  registry
    .set_shared("telemetry", Definition::aware_instance(Telemetry::default()))
    .unwrap();

  let telemetry: Arc<Telemetry> = registry.get_as("telemetry").unwrap();
  {
    let weak = telemetry.registry.lock().unwrap();
    assert!(weak.as_ref().unwrap().upgrade().is_some());
  }

  drop(registry);

  let weak = telemetry.registry.lock().unwrap();
  assert!(weak.as_ref().unwrap().upgrade().is_none());
}
