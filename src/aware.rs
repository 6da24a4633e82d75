//! The container back-reference capability.

use std::any::Any;

use crate::container::Container;

/// Opt-in capability for services that want a handle to the registry that
/// resolved them.
///
/// The container calls `set_container` after every successful `get`,
/// including cache hits on shared entries, so implementations must treat
/// re-injection as idempotent. The injected handle is a strong, cheap clone;
/// a long-lived shared service that should not keep its registry alive can
/// store [`container.downgrade()`](crate::Container::downgrade) instead.
///
/// Registrations opt in through the aware-flavored erasure heads
/// ([`Definition::aware_factory`](crate::Definition::aware_factory),
/// [`Definition::aware_instance`](crate::Definition::aware_instance),
/// [`Container::bind_aware`](crate::Container::bind_aware)), which is where
/// the concrete type is known and the capability can be recorded.
///
/// Because the handle arrives through `&self`, implementations keep it in an
/// interior-mutable slot:
///
/// ```
/// use std::sync::Mutex;
/// use weft_ioc::{Container, ContainerAware, Definition};
///
/// #[derive(Default)]
/// struct Dispatcher {
///   container: Mutex<Option<Container>>,
/// }
///
/// impl ContainerAware for Dispatcher {
///   fn set_container(&self, container: Container) {
///     *self.container.lock().unwrap() = Some(container);
///   }
/// }
///
/// let registry = Container::new();
/// registry
///   .set("dispatcher", Definition::aware_instance(Dispatcher::default()))
///   .unwrap();
///
/// let dispatcher = registry.get_as::<Dispatcher>("dispatcher").unwrap();
/// assert!(dispatcher.container.lock().unwrap().is_some());
/// ```
pub trait ContainerAware: Any + Send + Sync {
  /// Receives the registry that produced this instance.
  fn set_container(&self, container: Container);
}
