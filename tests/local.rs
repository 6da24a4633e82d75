use std::cell::{Cell, RefCell};
use std::rc::Rc;

use weft_ioc::{
  Error, LocalArgs, LocalConstruct, LocalContainer, LocalContainerAware, LocalDefinition,
  LocalInstance,
};

#[test]
fn test_local_shared_service_resolves_to_the_same_instance() {
  let container = LocalContainer::new();
  container
    .set_shared("greeting", LocalDefinition::factory(|_c, _a| "hello".to_string()))
    .unwrap();

  let r1: Rc<String> = container.get_as("greeting").unwrap();
  let r2: Rc<String> = container.get_as("greeting").unwrap();

  assert_eq!(*r1, "hello");
  // Ensure it's shared by checking pointer equality.
  assert!(Rc::ptr_eq(&r1, &r2));
}

#[test]
fn test_local_transient_service_is_fresh_each_time() {
  let container = LocalContainer::new();
  // Use a Cell to show that we get new instances.
  container
    .set("counter", LocalDefinition::factory(|_c, _a| Cell::new(10)))
    .unwrap();

  let r1: Rc<Cell<i32>> = container.get_as("counter").unwrap();
  let r2: Rc<Cell<i32>> = container.get_as("counter").unwrap();

  r1.set(20);

  assert_eq!(r1.get(), 20);
  assert_eq!(r2.get(), 10); // r2 is a different instance
  assert!(!Rc::ptr_eq(&r1, &r2));
}

#[test]
fn test_local_container_holds_not_send_sync_types() {
  // `Rc<i32>` is neither `Send` nor `Sync`, so this registration is
  // impossible with the thread-safe container.
  struct NotSendSync {
    data: Rc<i32>,
  }

  let container = LocalContainer::new();
  let shared_data = Rc::new(42);

  container
    .set_shared(
      "service",
      LocalDefinition::factory(move |_c, _a| NotSendSync {
        data: Rc::clone(&shared_data),
      }),
    )
    .unwrap();

  let service: Rc<NotSendSync> = container.get_as("service").unwrap();
  assert_eq!(*service.data, 42);

  let service2: Rc<NotSendSync> = container.get_as("service").unwrap();
  assert!(Rc::ptr_eq(&service.data, &service2.data));
}

#[test]
#[should_panic(expected = "Circular dependency detected")]
fn test_local_circular_dependency_panics() {
  struct ServiceA {
    _b: Rc<ServiceB>,
  }
  struct ServiceB {
    _a: Rc<ServiceA>,
  }

  // Factories receive the resolving container directly, so a cycle needs no
  // extra plumbing to express.
  let container = LocalContainer::new();
  container
    .set_shared(
      "a",
      LocalDefinition::factory(|c, _a| ServiceA {
        _b: c.get_as("b").unwrap(),
      }),
    )
    .unwrap();
  container
    .set_shared(
      "b",
      LocalDefinition::factory(|c, _a| ServiceB {
        _a: c.get_as("a").unwrap(),
      }),
    )
    .unwrap();

  // Resolution path: get(a) -> factory(a) -> get(b) -> factory(b) -> get(a) -> panic.
  let _ = container.get("a");
}

#[test]
fn test_local_locking_matches_the_thread_safe_container() {
  let container = LocalContainer::new();
  container
    .set_locked("engine", LocalInstance::new("original".to_string()))
    .unwrap();

  assert_eq!(
    container
      .set("engine", LocalInstance::new("usurper".to_string()))
      .unwrap_err(),
    Error::Locked("engine".to_string())
  );
  assert_eq!(
    container.remove("engine").unwrap_err(),
    Error::RemoveLocked("engine".to_string())
  );

  let value: Rc<String> = container.get_as("engine").unwrap();
  assert_eq!(*value, "original");
}

#[test]
fn test_local_aware_services_receive_the_container() {
  #[derive(Default)]
  struct Dispatcher {
    container: RefCell<Option<LocalContainer>>,
    injections: Cell<usize>,
  }

  impl LocalContainerAware for Dispatcher {
    fn set_container(&self, container: LocalContainer) {
      self.injections.set(self.injections.get() + 1);
      *self.container.borrow_mut() = Some(container);
    }
  }

  // Arrange
  let container = LocalContainer::new();
  container
    .set("dispatcher", LocalDefinition::aware_instance(Dispatcher::default()))
    .unwrap();

  // Act
  container.get("dispatcher").unwrap();
  let dispatcher: Rc<Dispatcher> = container.get_as("dispatcher").unwrap();

  // Assert: one injection per `get`, two so far.
  assert_eq!(dispatcher.injections.get(), 2);
  let injected = dispatcher.container.borrow().clone().unwrap();
  assert!(LocalContainer::ptr_eq(&injected, &container));
}

#[test]
fn test_local_bound_type_names_construct_instances() {
  struct Greeter {
    greeting: String,
  }

  impl LocalConstruct for Greeter {
    fn construct(_container: &LocalContainer, args: &LocalArgs) -> Self {
      Greeter {
        greeting: args
          .get::<String>(0)
          .cloned()
          .unwrap_or_else(|| "hello".to_string()),
      }
    }
  }

  // Arrange: the bare string definition is type-name sugar here too.
  let container = LocalContainer::new();
  container.bind::<Greeter>("app.greeter");
  container.set("greeter", "app.greeter").unwrap();

  // Act
  let defaulted: Rc<Greeter> = container.get_as("greeter").unwrap();

  let mut args = LocalArgs::new();
  args.push("hi".to_string());
  let custom: Rc<Greeter> = container.get_as_with("greeter", &args).unwrap();

  // Assert
  assert_eq!(defaulted.greeting, "hello");
  assert_eq!(custom.greeting, "hi");
}

#[test]
fn test_local_instance_definitions_hand_out_one_object() {
  let container = LocalContainer::new();
  container
    .set("value", LocalInstance::new(9_u32))
    .unwrap();

  let r1: Rc<u32> = container.get_as("value").unwrap();
  let r2: Rc<u32> = container.get_as("value").unwrap();

  assert_eq!(*r1, 9);
  assert!(Rc::ptr_eq(&r1, &r2));
}
