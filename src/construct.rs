//! Constructor bindings backing the type-name definition variant.

use std::any::Any;
use std::sync::Arc;

use crate::args::Args;
use crate::container::Container;
use crate::instance::Instance;

/// A type constructible by name through a container's type table.
///
/// Rust has no runtime class lookup, so a [`Definition::type_name`]
/// registration resolves through constructors bound up front with
/// [`Container::bind`]. The constructor receives the resolving container
/// (so it can pull its own dependencies) and the caller's positional args.
///
/// [`Definition::type_name`]: crate::Definition::type_name
/// [`Container::bind`]: crate::Container::bind
///
/// # Examples
///
/// ```
/// use weft_ioc::{Args, Construct, Container, Definition};
///
/// struct Greeter {
///   greeting: String,
/// }
///
/// impl Construct for Greeter {
///   fn construct(_container: &Container, args: &Args) -> Self {
///     let greeting = args
///       .get::<String>(0)
///       .cloned()
///       .unwrap_or_else(|| "hello".to_owned());
///     Greeter { greeting }
///   }
/// }
///
/// let registry = Container::new();
/// registry.bind::<Greeter>("app.greeter");
/// registry.set("greeter", Definition::type_name("app.greeter")).unwrap();
///
/// let greeter = registry.get_as::<Greeter>("greeter").unwrap();
/// assert_eq!(greeter.greeting, "hello");
/// ```
pub trait Construct: Any + Send + Sync + Sized {
  /// Builds a fresh value for one resolution.
  fn construct(container: &Container, args: &Args) -> Self;
}

// Erased constructor stored in a container's type table.
pub(crate) type ConstructorFn = Arc<dyn Fn(&Container, &Args) -> Instance + Send + Sync>;
