//! Map-style view over a container.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::args::Args;
use crate::container::Container;
use crate::definition::Definition;
use crate::error::Result;
use crate::instance::Instance;

/// A map-flavored view of a [`Container`].
///
/// Rust has no subscript overloading for fallible, side-effecting accesses,
/// so the container's collection-like face is a wrapper with the standard
/// map vocabulary: [`insert`](ServiceMap::insert), [`get`](ServiceMap::get),
/// [`contains_key`](ServiceMap::contains_key), [`remove`](ServiceMap::remove).
/// Entries inserted through this view are transient and unlocked; use the
/// container's `set_*` heads directly for other policies.
///
/// The view is a handle onto the same registry, so it can be mixed freely
/// with the container API:
///
/// ```
/// use weft_ioc::{Container, Instance};
///
/// let registry = Container::new();
/// let map = registry.as_map();
///
/// map.insert("answer", Instance::new(42u32)).unwrap();
/// assert!(registry.has("answer"));
///
/// let answer = map.get("answer").unwrap();
/// assert_eq!(answer.downcast_ref::<u32>(), Some(&42));
/// ```
#[derive(Clone)]
pub struct ServiceMap {
  container: Container,
}

impl ServiceMap {
  /// Registers `definition` under `key` as a transient, unlocked service,
  /// replacing any existing unlocked entry.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Locked`](crate::Error::Locked) if the key is already
  /// registered and locked.
  pub fn insert(&self, key: impl Into<String>, definition: impl Into<Definition>) -> Result<()> {
    self.container.set(key, definition)
  }

  /// Resolves the service under `key` with empty args.
  ///
  /// # Errors
  ///
  /// Returns [`Error::NotFound`](crate::Error::NotFound) if the key is not
  /// registered.
  pub fn get(&self, key: &str) -> Result<Instance> {
    self.container.get(key)
  }

  /// Resolves the service under `key`, forwarding `args`.
  ///
  /// # Errors
  ///
  /// Returns [`Error::NotFound`](crate::Error::NotFound) if the key is not
  /// registered.
  pub fn get_with(&self, key: &str, args: &Args) -> Result<Instance> {
    self.container.get_with(key, args)
  }

  /// Resolves the service under `key` and downcasts it to `T`.
  ///
  /// # Errors
  ///
  /// Returns [`Error::NotFound`](crate::Error::NotFound) if the key is not
  /// registered, or [`Error::TypeMismatch`](crate::Error::TypeMismatch) if
  /// the instance is not a `T`.
  pub fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
    self.container.get_as(key)
  }

  /// Whether `key` is registered.
  pub fn contains_key(&self, key: &str) -> bool {
    self.container.has(key)
  }

  /// Removes the entry under `key`. Removing an absent key is a no-op.
  ///
  /// # Errors
  ///
  /// Returns [`Error::RemoveLocked`](crate::Error::RemoveLocked) if the
  /// entry is locked.
  pub fn remove(&self, key: &str) -> Result<()> {
    self.container.remove(key)
  }

  /// The number of registered entries.
  pub fn len(&self) -> usize {
    self.container.len()
  }

  /// Whether the registry is empty.
  pub fn is_empty(&self) -> bool {
    self.container.is_empty()
  }

  /// The underlying container handle.
  pub fn container(&self) -> &Container {
    &self.container
  }
}

impl From<Container> for ServiceMap {
  fn from(container: Container) -> Self {
    Self { container }
  }
}

impl fmt::Debug for ServiceMap {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ServiceMap")
      .field("len", &self.len())
      .finish()
  }
}
