//! A single registered service entry and its resolution logic.

use std::fmt;

use once_cell::sync::OnceCell;

use crate::args::Args;
use crate::container::Container;
use crate::definition::Definition;
use crate::instance::Instance;

/// One registered entry: a definition plus its resolution policy and, for
/// shared entries, the cached resolved instance.
///
/// `shared` and `locked` are independent. Sharing is a caching policy: one
/// instance per name versus a fresh instance per call. Locking is a registry
/// integrity policy: the entry can no longer be replaced or removed. A
/// locked entry still resolves as often as anyone likes.
pub struct Service {
  name: String,
  definition: Definition,
  shared: bool,
  locked: bool,
  cell: OnceCell<Instance>,
}

impl Service {
  pub(crate) fn new(name: String, definition: Definition, shared: bool, locked: bool) -> Self {
    Self {
      name,
      definition,
      shared,
      locked,
      cell: OnceCell::new(),
    }
  }

  /// The name this entry is registered under.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The registered definition.
  pub fn definition(&self) -> &Definition {
    &self.definition
  }

  /// Whether resolutions share one cached instance.
  pub fn is_shared(&self) -> bool {
    self.shared
  }

  /// Whether the entry is frozen against replacement and removal.
  pub fn is_locked(&self) -> bool {
    self.locked
  }

  /// Whether a shared instance has been cached already.
  ///
  /// Always `false` for transient entries, which cache nothing.
  pub fn is_resolved(&self) -> bool {
    self.cell.get().is_some()
  }

  /// Resolves this entry to an instance.
  ///
  /// A shared entry instantiates on the first call and returns the cached
  /// instance on every later call, whatever args are passed; the cache is
  /// written at most once (first write wins under concurrent first
  /// resolutions). A transient entry instantiates every time. The container
  /// handle is forwarded to factory closures and bound constructors so they
  /// can pull their own dependencies.
  ///
  /// This is the bare resolution step: container-aware back-injection is
  /// performed by [`Container::get`], not here.
  pub fn resolve(&self, container: &Container, args: &Args) -> Instance {
    if self.shared {
      self
        .cell
        .get_or_init(|| self.instantiate(container, args))
        .clone()
    } else {
      self.instantiate(container, args)
    }
  }

  fn instantiate(&self, container: &Container, args: &Args) -> Instance {
    match &self.definition {
      Definition::Factory(factory) => factory(container, args),
      Definition::Instance(instance) => instance.clone(),
      Definition::TypeName(type_name) => container.construct_named(type_name, args),
    }
  }
}

impl fmt::Debug for Service {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Service")
      .field("name", &self.name)
      .field("definition", &self.definition)
      .field("shared", &self.shared)
      .field("locked", &self.locked)
      .field("resolved", &self.is_resolved())
      .finish()
  }
}
