//! The process-wide default container.

use once_cell::sync::Lazy;

use crate::container::Container;

static GLOBAL_CONTAINER: Lazy<Container> = Lazy::new(Container::new);

/// A handle to the process-wide default container.
///
/// Created lazily on first access and alive for the rest of the process.
/// The [`resolve!`](crate::resolve) and [`maybe_resolve!`](crate::maybe_resolve)
/// macros go through this container; code that prefers explicit wiring can
/// ignore it entirely and pass [`Container`] handles around instead.
///
/// ```
/// use std::sync::Arc;
/// use weft_ioc::{global, Definition};
///
/// global()
///   .set_shared("global.greeting", Definition::factory(|_c, _a| String::from("hello")))
///   .unwrap();
///
/// let greeting: Arc<String> = global().get_as("global.greeting").unwrap();
/// assert_eq!(greeting.as_str(), "hello");
/// ```
pub fn global() -> &'static Container {
  &GLOBAL_CONTAINER
}
