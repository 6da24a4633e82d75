//! Core, non-public machinery shared by the container implementations.

use std::cell::RefCell;
use std::collections::HashSet;

thread_local! {
  // This thread-local variable holds the set of services currently being
  // resolved on this specific thread. This is the key to detecting circular
  // dependencies.
  static RESOLVING_STACK: RefCell<HashSet<ResolveKey>> = RefCell::new(HashSet::new());
}

// Identity of one in-flight resolution: which container, which name. The
// container address keeps independent containers from aliasing each other
// when both resolve the same service name on one thread.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ResolveKey {
  container: usize,
  name: String,
}

/// An RAII guard to detect and prevent circular dependencies.
///
/// When created, it adds a resolution key to the thread-local resolution
/// stack. If the key is already present, the resolution is cyclic and the
/// guard panics. When the guard is dropped, it removes the key again.
pub(crate) struct ResolutionGuard {
  key: ResolveKey,
}

impl ResolutionGuard {
  pub(crate) fn new(container: usize, name: &str) -> Self {
    let key = ResolveKey {
      container,
      name: name.to_owned(),
    };
    RESOLVING_STACK.with(|stack| {
      // `insert` returns `false` if the value was already present.
      if !stack.borrow_mut().insert(key.clone()) {
        panic!(
          "Circular dependency detected while resolving service: {:?}",
          key.name
        );
      }
    });
    Self { key }
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&self.key);
    });
  }
}
