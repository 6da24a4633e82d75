//! The recipe for producing a service instance.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::args::Args;
use crate::aware::ContainerAware;
use crate::container::Container;
use crate::instance::Instance;

// Factory closure stored by the `Factory` variant.
pub(crate) type FactoryFn = Arc<dyn Fn(&Container, &Args) -> Instance + Send + Sync>;

/// The recipe a [`Service`](crate::Service) entry resolves into an instance.
///
/// Exactly three kinds of recipe exist:
///
/// - [`factory`](Definition::factory): a closure invoked on every
///   instantiation. It receives the resolving container (so it can pull
///   other services during its own construction logic) and the caller's
///   positional args.
/// - [`instance`](Definition::instance): an already-built value handed out
///   on every resolution; args are ignored.
/// - [`type_name`](Definition::type_name): the name of a constructor bound
///   in the resolving container's type table, invoked with container and
///   args.
///
/// The `aware_*` heads erase types implementing [`ContainerAware`], which
/// lets the container recognize and back-inject the produced instances.
///
/// `&str`/`String` convert into type-name definitions, mirroring the string
/// form of a class reference:
///
/// ```
/// use weft_ioc::{Container, Definition};
///
/// let registry = Container::new();
/// registry.set("logger", "logger.stderr").unwrap();
///
/// assert!(matches!(
///   registry.service("logger").unwrap().definition(),
///   Definition::TypeName(name) if name == "logger.stderr"
/// ));
/// ```
#[derive(Clone)]
pub enum Definition {
  /// Invoke a closure at resolution time.
  Factory(FactoryFn),
  /// Hand out a pre-built value.
  Instance(Instance),
  /// Construct a bound type by name.
  TypeName(String),
}

impl Definition {
  /// A definition that runs `factory` on each instantiation.
  pub fn factory<T, F>(factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Container, &Args) -> T + Send + Sync + 'static,
  {
    Definition::Factory(Arc::new(move |container: &Container, args: &Args| {
      Instance::new(factory(container, args))
    }))
  }

  /// Like [`factory`](Definition::factory), for factories producing
  /// container-aware types.
  pub fn aware_factory<T, F>(factory: F) -> Self
  where
    T: ContainerAware,
    F: Fn(&Container, &Args) -> T + Send + Sync + 'static,
  {
    Definition::Factory(Arc::new(move |container: &Container, args: &Args| {
      Instance::aware(factory(container, args))
    }))
  }

  /// A definition wrapping an existing value.
  pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
    Definition::Instance(Instance::new(value))
  }

  /// Like [`instance`](Definition::instance), for container-aware values.
  pub fn aware_instance<T: ContainerAware>(value: T) -> Self {
    Definition::Instance(Instance::aware(value))
  }

  /// A definition deferring to the constructor bound under `name` in the
  /// resolving container's type table.
  pub fn type_name(name: impl Into<String>) -> Self {
    Definition::TypeName(name.into())
  }
}

impl From<Instance> for Definition {
  fn from(instance: Instance) -> Self {
    Definition::Instance(instance)
  }
}

impl From<&str> for Definition {
  fn from(name: &str) -> Self {
    Definition::TypeName(name.to_owned())
  }
}

impl From<String> for Definition {
  fn from(name: String) -> Self {
    Definition::TypeName(name)
  }
}

impl fmt::Debug for Definition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Definition::Factory(_) => f.write_str("Factory"),
      Definition::Instance(instance) => write!(f, "Instance({})", instance.type_name()),
      Definition::TypeName(name) => write!(f, "TypeName({:?})", name),
    }
  }
}
