//! The service container: a thread-safe, string-keyed service registry.

use std::any::{self, Any};
use std::fmt;
use std::sync::{Arc, Weak};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, trace};

use crate::args::Args;
use crate::aware::ContainerAware;
use crate::construct::{Construct, ConstructorFn};
use crate::core::ResolutionGuard;
use crate::definition::Definition;
use crate::error::{Error, Result};
use crate::instance::Instance;
use crate::map::ServiceMap;
use crate::service::Service;

#[derive(Default)]
struct ContainerInner {
  services: DashMap<String, Arc<Service>>,
  types: DashMap<String, ConstructorFn>,
}

/// A thread-safe, string-keyed service registry with lazy resolution.
///
/// Services are registered by name with a [`Definition`] (a factory closure,
/// a pre-built instance, or a type name bound via [`Container::bind`]) and a
/// pair of per-name policies: **shared** entries resolve once and hand out
/// the cached instance thereafter, **locked** entries refuse replacement and
/// removal. Resolution is lazy: nothing is constructed until the first
/// [`get`](Container::get) for the name.
///
/// `Container` is a cheap handle over shared state. Cloning it yields a
/// second handle to the same registry, so it can be passed freely into
/// factories, spawned threads, and the services themselves.
///
/// ```
/// use std::sync::Arc;
/// use weft_ioc::{Container, Definition};
///
/// struct Clock;
///
/// let registry = Container::new();
/// registry
///   .set_shared("clock", Definition::factory(|_c, _a| Clock))
///   .unwrap();
///
/// let a: Arc<Clock> = registry.get_as("clock").unwrap();
/// let b: Arc<Clock> = registry.get_as("clock").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Clone, Default)]
pub struct Container {
  inner: Arc<ContainerInner>,
}

impl Container {
  /// Creates an empty container.
  pub fn new() -> Self {
    Self::default()
  }

  /// A stable identity for this registry, shared by all cloned handles.
  fn address(&self) -> usize {
    Arc::as_ptr(&self.inner) as usize
  }

  // --- REGISTRATION ---

  /// Registers a transient, unlocked service under `name`.
  ///
  /// Accepts anything convertible into a [`Definition`]: a factory closure
  /// wrapped by [`Definition::factory`], a pre-built [`Instance`], or a
  /// string type name previously bound with [`Container::bind`]. Replaces
  /// any existing unlocked entry under the same name and drops that entry's
  /// cached instance along with it.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Locked`] if the name is already registered and locked.
  pub fn set(&self, name: impl Into<String>, definition: impl Into<Definition>) -> Result<()> {
    self.set_internal(name.into(), definition.into(), false, false)
  }

  /// Registers a shared, unlocked service under `name`.
  ///
  /// The first [`get`](Container::get) resolves the definition and caches
  /// the instance; every later `get` returns the cached instance, ignoring
  /// any call-time args.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Locked`] if the name is already registered and locked.
  pub fn set_shared(
    &self,
    name: impl Into<String>,
    definition: impl Into<Definition>,
  ) -> Result<()> {
    self.set_internal(name.into(), definition.into(), true, false)
  }

  /// Registers a transient, locked service under `name`.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Locked`] if the name is already registered and locked.
  pub fn set_locked(
    &self,
    name: impl Into<String>,
    definition: impl Into<Definition>,
  ) -> Result<()> {
    self.set_internal(name.into(), definition.into(), false, true)
  }

  /// Registers a shared, locked service under `name`.
  ///
  /// The usual shape for process-wide infrastructure: resolved once, cached,
  /// and immune to later replacement or removal.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Locked`] if the name is already registered and locked.
  pub fn set_shared_locked(
    &self,
    name: impl Into<String>,
    definition: impl Into<Definition>,
  ) -> Result<()> {
    self.set_internal(name.into(), definition.into(), true, true)
  }

  fn set_internal(
    &self,
    name: String,
    definition: Definition,
    shared: bool,
    locked: bool,
  ) -> Result<()> {
    match self.inner.services.entry(name) {
      Entry::Occupied(mut occupied) => {
        if occupied.get().is_locked() {
          return Err(Error::Locked(occupied.key().clone()));
        }
        let service = Arc::new(Service::new(occupied.key().clone(), definition, shared, locked));
        debug!(
          service = %service.name(),
          shared,
          locked,
          replaced = true,
          "registered service"
        );
        occupied.insert(service);
      }
      Entry::Vacant(vacant) => {
        let service = Arc::new(Service::new(vacant.key().clone(), definition, shared, locked));
        debug!(
          service = %service.name(),
          shared,
          locked,
          replaced = false,
          "registered service"
        );
        vacant.insert(service);
      }
    }
    Ok(())
  }

  // --- RESOLUTION ---

  /// Resolves the service registered under `name` with empty args.
  ///
  /// For shared entries this returns the cached instance, resolving it first
  /// if this is the initial call; for transient entries it produces a fresh
  /// instance. If the resolved value was registered through an aware head,
  /// its [`ContainerAware::set_container`] hook is invoked with a handle to
  /// this container on every `get`, after resolution.
  ///
  /// Re-entrant resolution of the same name on the same thread (a dependency
  /// cycle) panics rather than deadlocking.
  ///
  /// # Errors
  ///
  /// Returns [`Error::NotFound`] if nothing is registered under `name`.
  pub fn get(&self, name: &str) -> Result<Instance> {
    self.get_with(name, &Args::new())
  }

  /// Resolves the service registered under `name`, forwarding `args` to its
  /// factory or bound constructor.
  ///
  /// Args only influence instantiation. A shared entry that has already
  /// cached its instance returns that instance untouched, whatever args are
  /// passed here.
  ///
  /// # Errors
  ///
  /// Returns [`Error::NotFound`] if nothing is registered under `name`.
  pub fn get_with(&self, name: &str, args: &Args) -> Result<Instance> {
    trace!(service = %name, "resolving service");
    let service = self
      .inner
      .services
      .get(name)
      .map(|entry| Arc::clone(entry.value()))
      .ok_or_else(|| Error::NotFound(name.to_owned()))?;

    // Clone the entry out before resolving so no map guard is held while
    // the factory runs. Factories are free to re-enter the container.
    let instance = {
      let _guard = ResolutionGuard::new(self.address(), name);
      service.resolve(self, args)
    };

    // Back-injection happens on every get, outside the guard: the hook may
    // itself resolve services, including this one.
    if let Some(aware) = instance.aware_view() {
      trace!(service = %name, "injecting container into aware service");
      aware.set_container(self.clone());
    }

    Ok(instance)
  }

  /// Resolves `name` and downcasts the instance to `T`.
  ///
  /// # Errors
  ///
  /// Returns [`Error::NotFound`] if nothing is registered under `name`, or
  /// [`Error::TypeMismatch`] if the resolved instance is not a `T`.
  pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    self.get_as_with(name, &Args::new())
  }

  /// Resolves `name` with `args` and downcasts the instance to `T`.
  ///
  /// # Errors
  ///
  /// Returns [`Error::NotFound`] if nothing is registered under `name`, or
  /// [`Error::TypeMismatch`] if the resolved instance is not a `T`.
  pub fn get_as_with<T: Any + Send + Sync>(&self, name: &str, args: &Args) -> Result<Arc<T>> {
    let instance = self.get_with(name, args)?;
    let resolved = instance.type_name();
    instance.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
      name: name.to_owned(),
      requested: any::type_name::<T>(),
      resolved,
    })
  }

  // --- INSPECTION AND REMOVAL ---

  /// Whether a service is registered under `name`.
  pub fn has(&self, name: &str) -> bool {
    self.inner.services.contains_key(name)
  }

  /// Removes the service registered under `name`, dropping its cached
  /// instance if it had one. Removing an unregistered name is a no-op.
  ///
  /// # Errors
  ///
  /// Returns [`Error::RemoveLocked`] if the entry is locked. The entry is
  /// left in place.
  pub fn remove(&self, name: &str) -> Result<()> {
    match self.inner.services.entry(name.to_owned()) {
      Entry::Occupied(occupied) => {
        if occupied.get().is_locked() {
          return Err(Error::RemoveLocked(occupied.key().clone()));
        }
        debug!(service = %name, "removed service");
        occupied.remove();
        Ok(())
      }
      Entry::Vacant(_) => Ok(()),
    }
  }

  /// The registered entry under `name`, if any.
  ///
  /// Exposes the entry's policies and definition for inspection. The entry
  /// is a snapshot handle: a later [`set`](Container::set) under the same
  /// name replaces the registry's entry but does not affect handles already
  /// returned.
  pub fn service(&self, name: &str) -> Option<Arc<Service>> {
    self
      .inner
      .services
      .get(name)
      .map(|entry| Arc::clone(entry.value()))
  }

  /// The names of all registered services, in no particular order.
  pub fn names(&self) -> Vec<String> {
    self
      .inner
      .services
      .iter()
      .map(|entry| entry.key().clone())
      .collect()
  }

  /// The number of registered services.
  pub fn len(&self) -> usize {
    self.inner.services.len()
  }

  /// Whether no services are registered.
  pub fn is_empty(&self) -> bool {
    self.inner.services.is_empty()
  }

  // --- TYPE BINDING ---

  /// Binds `type_name` to `T`'s [`Construct`] impl, so that a string
  /// definition registered under that name can be resolved.
  ///
  /// Instances built through this binding are plain: they take no part in
  /// container-aware injection. Use [`Container::bind_aware`] for types that
  /// should receive the container on every `get`.
  pub fn bind<T: Construct>(&self, type_name: impl Into<String>) {
    self.bind_constructor(
      type_name.into(),
      Arc::new(|container: &Container, args: &Args| {
        Instance::new(T::construct(container, args))
      }),
    );
  }

  /// Binds `type_name` to `T`'s [`Construct`] impl, recording `T`'s
  /// [`ContainerAware`] capability so instances built through this binding
  /// are back-injected on every `get`.
  pub fn bind_aware<T: Construct + ContainerAware>(&self, type_name: impl Into<String>) {
    self.bind_constructor(
      type_name.into(),
      Arc::new(|container: &Container, args: &Args| {
        Instance::aware(T::construct(container, args))
      }),
    );
  }

  fn bind_constructor(&self, type_name: String, constructor: ConstructorFn) {
    debug!(type_name = %type_name, "bound constructor");
    self.inner.types.insert(type_name, constructor);
  }

  /// Runs the constructor bound under `type_name`.
  ///
  /// Panics if no constructor is bound: an unbound type name is a wiring
  /// bug surfacing at first resolution, the same class of failure as a
  /// panicking factory.
  pub(crate) fn construct_named(&self, type_name: &str, args: &Args) -> Instance {
    let constructor = self
      .inner
      .types
      .get(type_name)
      .map(|entry| Arc::clone(entry.value()))
      .unwrap_or_else(|| panic!("no constructor bound for type name {:?}", type_name));
    constructor(self, args)
  }

  // --- HANDLES ---

  /// A map-style view over this registry.
  ///
  /// [`ServiceMap`] offers `insert`/`get`/`contains_key`/`remove` naming for
  /// callers that want the container to read like a collection. Both views
  /// share the same state.
  pub fn as_map(&self) -> ServiceMap {
    ServiceMap::from(self.clone())
  }

  /// A weak handle that does not keep the registry alive.
  ///
  /// Useful for services that want to call back into their container
  /// without creating a reference cycle through a shared cached instance.
  pub fn downgrade(&self) -> WeakContainer {
    WeakContainer {
      inner: Arc::downgrade(&self.inner),
    }
  }

  /// Whether two handles refer to the same registry.
  pub fn ptr_eq(a: &Container, b: &Container) -> bool {
    Arc::ptr_eq(&a.inner, &b.inner)
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("services", &self.inner.services.len())
      .field("types", &self.inner.types.len())
      .finish()
  }
}

/// A non-owning handle to a [`Container`].
///
/// Obtained from [`Container::downgrade`]. Upgrade back to a strong handle
/// with [`WeakContainer::upgrade`]; this fails once every strong handle has
/// been dropped.
#[derive(Clone)]
pub struct WeakContainer {
  inner: Weak<ContainerInner>,
}

impl WeakContainer {
  /// Attempts to recover a strong handle to the registry.
  pub fn upgrade(&self) -> Option<Container> {
    self.inner.upgrade().map(|inner| Container { inner })
  }
}

impl fmt::Debug for WeakContainer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WeakContainer").finish_non_exhaustive()
  }
}
