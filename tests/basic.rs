use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use weft_ioc::{args, Container, Definition, Error, Instance};

// --- Test Fixtures ---

#[derive(Debug, PartialEq, Eq)]
struct SimpleService {
  id: u32,
}

// --- Registration and Resolution ---

#[test]
fn test_shared_service_resolves_to_the_same_instance() {
  // Arrange
  let registry = Container::new();
  registry
    .set_shared("simple", Definition::factory(|_c, _a| SimpleService { id: 101 }))
    .unwrap();

  // Act
  let r1: Arc<SimpleService> = registry.get_as("simple").unwrap();
  let r2: Arc<SimpleService> = registry.get_as("simple").unwrap();

  // Assert
  assert_eq!(r1.id, 101);
  // Ensure it's shared by checking pointer equality.
  assert!(Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_transient_service_resolves_to_fresh_instances() {
  // Arrange
  let registry = Container::new();
  registry
    .set("simple", Definition::factory(|_c, _a| SimpleService { id: 303 }))
    .unwrap();

  // Act
  let r1: Arc<SimpleService> = registry.get_as("simple").unwrap();
  let r2: Arc<SimpleService> = registry.get_as("simple").unwrap();

  // Assert
  assert_eq!(r1.id, 303);
  assert_eq!(r2.id, 303);
  // Ensure it's transient by checking the pointers are different.
  assert!(!Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_resolution_is_lazy() {
  // Registration must not run the factory; only the first `get` does.
  static FACTORY_RUNS: AtomicUsize = AtomicUsize::new(0);

  // Arrange
  let registry = Container::new();
  registry
    .set_shared(
      "lazy",
      Definition::factory(|_c, _a| {
        FACTORY_RUNS.fetch_add(1, Ordering::SeqCst);
        SimpleService { id: 7 }
      }),
    )
    .unwrap();
  assert_eq!(FACTORY_RUNS.load(Ordering::SeqCst), 0);

  // Act
  let _first = registry.get("lazy").unwrap();
  let _second = registry.get("lazy").unwrap();

  // Assert: the shared factory ran exactly once, on the first `get`.
  assert_eq!(FACTORY_RUNS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_pre_built_instance_definitions_hand_out_one_object() {
  // Arrange: `Instance` converts straight into a definition.
  let registry = Container::new();
  registry
    .set("simple", Instance::new(SimpleService { id: 202 }))
    .unwrap();

  // Act
  let r1: Arc<SimpleService> = registry.get_as("simple").unwrap();
  let r2: Arc<SimpleService> = registry.get_as("simple").unwrap();

  // Assert: even under the transient policy, an instance definition has
  // nothing to re-instantiate, so every resolution is the same object.
  assert_eq!(r1.id, 202);
  assert!(Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_missing_service_is_reported_by_name() {
  // Arrange
  let registry = Container::new();

  // Act
  let error = registry.get("ghost").unwrap_err();

  // Assert
  assert_eq!(error, Error::NotFound("ghost".to_string()));
  assert_eq!(error.to_string(), "service \"ghost\" does not exist");
}

#[test]
fn test_has_and_remove_lifecycle() {
  // Arrange
  let registry = Container::new();
  assert!(!registry.has("simple"));

  registry
    .set("simple", Instance::new(SimpleService { id: 1 }))
    .unwrap();
  assert!(registry.has("simple"));

  // Act
  registry.remove("simple").unwrap();

  // Assert
  assert!(!registry.has("simple"));
  // Removing an unregistered name is a no-op, not an error.
  registry.remove("simple").unwrap();
}

#[test]
fn test_replacing_a_registration_takes_effect_immediately() {
  // The last registration for a name wins, and its predecessor's cached
  // instance goes with it.
  let registry = Container::new();

  registry
    .set_shared("value", Instance::new("first".to_string()))
    .unwrap();
  let first: Arc<String> = registry.get_as("value").unwrap();
  assert_eq!(first.as_str(), "first");

  registry
    .set_shared("value", Instance::new("second".to_string()))
    .unwrap();
  let second: Arc<String> = registry.get_as("value").unwrap();
  assert_eq!(second.as_str(), "second");
}

#[test]
fn test_get_as_rejects_the_wrong_type() {
  // Arrange
  let registry = Container::new();
  registry
    .set("value", Instance::new("not a number".to_string()))
    .unwrap();

  // Act
  let error = registry.get_as::<u32>("value").unwrap_err();

  // Assert
  match error {
    Error::TypeMismatch { name, .. } => assert_eq!(name, "value"),
    other => panic!("expected a type mismatch, got {:?}", other),
  }
  // The untyped accessor still works; the entry itself is fine.
  assert!(registry.get("value").unwrap().is::<String>());
}

// --- Resolution Arguments ---

#[test]
fn test_factories_receive_call_time_args() {
  // Arrange
  let registry = Container::new();
  registry
    .set(
      "greeting",
      Definition::factory(|_c, args| {
        let name = args
          .get::<String>(0)
          .cloned()
          .unwrap_or_else(|| "world".to_string());
        format!("hello {}", name)
      }),
    )
    .unwrap();

  // Act
  let custom: Arc<String> = registry
    .get_as_with("greeting", &args!["rust".to_string()])
    .unwrap();
  let default: Arc<String> = registry.get_as("greeting").unwrap();

  // Assert
  assert_eq!(custom.as_str(), "hello rust");
  assert_eq!(default.as_str(), "hello world");
}

#[test]
fn test_shared_entries_ignore_args_after_first_resolution() {
  // Only the instantiating call sees its args; cache hits return the stored
  // instance untouched.
  let registry = Container::new();
  registry
    .set_shared(
      "number",
      Definition::factory(|_c, args| args.get::<u32>(0).copied().unwrap_or(0)),
    )
    .unwrap();

  let first: Arc<u32> = registry.get_as_with("number", &args![1_u32]).unwrap();
  let second: Arc<u32> = registry.get_as_with("number", &args![2_u32]).unwrap();

  assert_eq!(*first, 1);
  assert_eq!(*second, 1);
}

// --- Introspection ---

#[test]
fn test_service_handles_expose_policies_and_resolution_state() {
  // Arrange
  let registry = Container::new();
  registry
    .set_shared_locked("config", Instance::new(SimpleService { id: 9 }))
    .unwrap();

  // Act
  let entry = registry.service("config").unwrap();

  // Assert
  assert_eq!(entry.name(), "config");
  assert!(entry.is_shared());
  assert!(entry.is_locked());
  assert!(!entry.is_resolved());

  registry.get("config").unwrap();
  assert!(entry.is_resolved());

  assert!(registry.names().contains(&"config".to_string()));
  assert_eq!(registry.len(), 1);
  assert!(!registry.is_empty());
}

// --- Map View ---

#[test]
fn test_map_view_shares_state_with_the_container() {
  // Arrange
  let registry = Container::new();
  let map = registry.as_map();

  // Act: write through the map, read through the container, and back.
  map.insert("answer", Instance::new(42_u32)).unwrap();

  // Assert
  assert!(registry.has("answer"));
  assert!(map.contains_key("answer"));
  assert_eq!(map.len(), 1);

  let answer = map.get("answer").unwrap();
  assert_eq!(answer.downcast_ref::<u32>(), Some(&42));

  let typed: Arc<u32> = map.get_as("answer").unwrap();
  assert_eq!(*typed, 42);

  map.remove("answer").unwrap();
  assert!(!registry.has("answer"));
  assert!(map.is_empty());
}
