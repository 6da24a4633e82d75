//! Positional arguments passed through `get` to factories and constructors.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An ordered, type-erased pack of positional resolution arguments.
///
/// [`Container::get_with`](crate::Container::get_with) hands these to the
/// definition being resolved: factory closures and bound constructors receive
/// `&Args` and read the positions they expect. A shared entry only ever sees
/// the args of the resolution that actually instantiates it; cache hits
/// ignore args entirely.
///
/// The [`args!`](crate::args) macro builds a pack from a value list.
///
/// # Examples
///
/// ```
/// use weft_ioc::Args;
///
/// let mut args = Args::new();
/// args.push(8080_u16);
/// args.push(String::from("localhost"));
///
/// assert_eq!(args.len(), 2);
/// assert_eq!(args.get::<u16>(0), Some(&8080));
/// assert_eq!(args.get::<String>(1).map(String::as_str), Some("localhost"));
/// assert!(args.get::<u16>(1).is_none()); // position 1 is not a u16
/// ```
#[derive(Clone, Default)]
pub struct Args {
  values: Vec<Arc<dyn Any + Send + Sync>>,
}

impl Args {
  /// Creates an empty argument pack.
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a value to the pack.
  pub fn push<T: Any + Send + Sync>(&mut self, value: T) {
    self.values.push(Arc::new(value));
  }

  /// Returns the number of arguments.
  pub fn len(&self) -> usize {
    self.values.len()
  }

  /// Returns whether the pack is empty.
  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Borrows the argument at `index`, if it exists and is a `T`.
  pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
    self.values.get(index).and_then(|value| value.downcast_ref::<T>())
  }

  /// Returns a shared handle to the argument at `index`, if it exists and is
  /// a `T`.
  pub fn get_arc<T: Any + Send + Sync>(&self, index: usize) -> Option<Arc<T>> {
    self
      .values
      .get(index)
      .and_then(|value| value.clone().downcast::<T>().ok())
  }
}

impl fmt::Debug for Args {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Args(len = {})", self.values.len())
  }
}
