//! The type-erased resolved value handed back by the container.

use std::any::{self, Any};
use std::fmt;
use std::sync::Arc;

use crate::aware::ContainerAware;

/// A resolved service instance.
///
/// `Instance` erases the concrete service type so that one `get` surface can
/// return any registered service. It keeps two views of a single allocation:
/// the `Any` view used for typed downcasts, and, when the concrete type
/// implements [`ContainerAware`], the capability view the container uses to
/// inject itself after every resolution.
///
/// Cloning an `Instance` clones handles, never the service itself.
#[derive(Clone)]
pub struct Instance {
  value: Arc<dyn Any + Send + Sync>,
  aware: Option<Arc<dyn ContainerAware>>,
  type_name: &'static str,
}

impl Instance {
  /// Erases a plain service value.
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self {
      value: Arc::new(value),
      aware: None,
      type_name: any::type_name::<T>(),
    }
  }

  /// Erases a service value that accepts a container back-reference.
  ///
  /// The capability view is recorded here, at the one point where the
  /// concrete type is statically known; `Container::get` later answers the
  /// capability test by looking at it.
  pub fn aware<T: ContainerAware>(value: T) -> Self {
    let value = Arc::new(value);
    let capability: Arc<dyn ContainerAware> = value.clone();
    Self {
      value,
      aware: Some(capability),
      type_name: any::type_name::<T>(),
    }
  }

  /// Attempts to downcast to a shared handle of the concrete service type.
  pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.value.clone().downcast::<T>().ok()
  }

  /// Attempts to borrow the instance as the concrete service type.
  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    self.value.downcast_ref::<T>()
  }

  /// Returns whether the erased value is a `T`.
  pub fn is<T: Any>(&self) -> bool {
    self.value.is::<T>()
  }

  /// The `std::any::type_name` of the erased concrete type.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// Whether the erased value opted in to the container back-reference.
  pub fn is_container_aware(&self) -> bool {
    self.aware.is_some()
  }

  /// Consumes the handle, returning the raw `Any` view.
  pub fn into_any(self) -> Arc<dyn Any + Send + Sync> {
    self.value
  }

  pub(crate) fn aware_view(&self) -> Option<&Arc<dyn ContainerAware>> {
    self.aware.as_ref()
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Instance")
      .field("type", &self.type_name)
      .field("container_aware", &self.aware.is_some())
      .finish()
  }
}
