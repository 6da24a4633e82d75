// src/local_container.rs

//! A single-threaded, non-thread-safe service container.

use std::any::{self, Any};
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::core::ResolutionGuard;
use crate::error::{Error, Result};

// --- ARGS ---

/// A positional bundle of call-time arguments for [`LocalContainer`]
/// factories and constructors.
///
/// The local counterpart of [`Args`](crate::Args); values only need `Any`,
/// so non-`Send` types can ride along.
#[derive(Default)]
pub struct LocalArgs {
  values: Vec<Rc<dyn Any>>,
}

impl LocalArgs {
  /// Creates an empty bundle.
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a value to the bundle.
  pub fn push<T: Any>(&mut self, value: T) {
    self.values.push(Rc::new(value));
  }

  /// The number of values in the bundle.
  pub fn len(&self) -> usize {
    self.values.len()
  }

  /// Whether the bundle is empty.
  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// A reference to the value at `index`, if present and a `T`.
  pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
    self.values.get(index).and_then(|value| value.downcast_ref::<T>())
  }

  /// A shared handle to the value at `index`, if present and a `T`.
  pub fn get_rc<T: Any>(&self, index: usize) -> Option<Rc<T>> {
    self
      .values
      .get(index)
      .and_then(|value| value.clone().downcast::<T>().ok())
  }
}

impl fmt::Debug for LocalArgs {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "LocalArgs(len = {})", self.values.len())
  }
}

// --- CAPABILITY TRAITS ---

/// Receives a [`LocalContainer`] handle after every resolution.
///
/// The local counterpart of [`ContainerAware`](crate::ContainerAware). The
/// hook takes `&self`, so implementors keep the handle behind `RefCell` or
/// `Cell`.
pub trait LocalContainerAware: Any {
  fn set_container(&self, container: LocalContainer);
}

/// Builds a value from a container and args, for string type-name
/// definitions bound with [`LocalContainer::bind`].
pub trait LocalConstruct: Any + Sized {
  fn construct(container: &LocalContainer, args: &LocalArgs) -> Self;
}

// --- INSTANCE ---

/// A type-erased resolved value handed out by [`LocalContainer::get`].
///
/// Like [`Instance`](crate::Instance) but backed by `Rc`, so values that are
/// not `Send + Sync` can be registered.
#[derive(Clone)]
pub struct LocalInstance {
  value: Rc<dyn Any>,
  aware: Option<Rc<dyn LocalContainerAware>>,
  type_name: &'static str,
}

impl LocalInstance {
  /// Wraps a plain value.
  pub fn new<T: Any>(value: T) -> Self {
    Self {
      value: Rc::new(value),
      aware: None,
      type_name: any::type_name::<T>(),
    }
  }

  /// Wraps a value and records its [`LocalContainerAware`] capability, so
  /// the container injects itself on every `get`.
  pub fn aware<T: LocalContainerAware>(value: T) -> Self {
    let value = Rc::new(value);
    let capability: Rc<dyn LocalContainerAware> = value.clone();
    Self {
      value,
      aware: Some(capability),
      type_name: any::type_name::<T>(),
    }
  }

  /// The concrete type this instance was created from.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// Whether the wrapped value was registered with container-aware
  /// injection.
  pub fn is_container_aware(&self) -> bool {
    self.aware.is_some()
  }

  /// Whether the wrapped value is a `T`.
  pub fn is<T: Any>(&self) -> bool {
    self.value.is::<T>()
  }

  /// The wrapped value as an `Rc<T>`, if it is a `T`.
  pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
    self.value.clone().downcast::<T>().ok()
  }

  /// A reference to the wrapped value, if it is a `T`.
  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    self.value.downcast_ref::<T>()
  }

  fn aware_view(&self) -> Option<&Rc<dyn LocalContainerAware>> {
    self.aware.as_ref()
  }
}

impl fmt::Debug for LocalInstance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LocalInstance")
      .field("type_name", &self.type_name)
      .field("container_aware", &self.is_container_aware())
      .finish()
  }
}

// --- DEFINITION ---

pub(crate) type LocalFactoryFn = Rc<dyn Fn(&LocalContainer, &LocalArgs) -> LocalInstance>;
type LocalConstructorFn = Rc<dyn Fn(&LocalContainer, &LocalArgs) -> LocalInstance>;

/// How a [`LocalContainer`] produces an instance for a name.
///
/// The local counterpart of [`Definition`](crate::Definition): a factory
/// closure, a pre-built instance, or the string name of a bound type.
#[derive(Clone)]
pub enum LocalDefinition {
  Factory(LocalFactoryFn),
  Instance(LocalInstance),
  TypeName(String),
}

impl LocalDefinition {
  /// Wraps a factory closure producing a plain value.
  pub fn factory<T, F>(factory: F) -> Self
  where
    T: Any,
    F: Fn(&LocalContainer, &LocalArgs) -> T + 'static,
  {
    Self::Factory(Rc::new(move |container: &LocalContainer, args: &LocalArgs| {
      LocalInstance::new(factory(container, args))
    }))
  }

  /// Wraps a factory closure whose product is container-aware.
  pub fn aware_factory<T, F>(factory: F) -> Self
  where
    T: LocalContainerAware,
    F: Fn(&LocalContainer, &LocalArgs) -> T + 'static,
  {
    Self::Factory(Rc::new(move |container: &LocalContainer, args: &LocalArgs| {
      LocalInstance::aware(factory(container, args))
    }))
  }

  /// Wraps a pre-built plain value.
  pub fn instance<T: Any>(value: T) -> Self {
    Self::Instance(LocalInstance::new(value))
  }

  /// Wraps a pre-built container-aware value.
  pub fn aware_instance<T: LocalContainerAware>(value: T) -> Self {
    Self::Instance(LocalInstance::aware(value))
  }

  /// Refers to a type name bound with [`LocalContainer::bind`].
  pub fn type_name(name: impl Into<String>) -> Self {
    Self::TypeName(name.into())
  }
}

impl From<LocalInstance> for LocalDefinition {
  fn from(instance: LocalInstance) -> Self {
    Self::Instance(instance)
  }
}

impl From<&str> for LocalDefinition {
  fn from(type_name: &str) -> Self {
    Self::TypeName(type_name.to_owned())
  }
}

impl From<String> for LocalDefinition {
  fn from(type_name: String) -> Self {
    Self::TypeName(type_name)
  }
}

impl fmt::Debug for LocalDefinition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Factory(_) => f.write_str("LocalDefinition::Factory"),
      Self::Instance(instance) => f.debug_tuple("LocalDefinition::Instance").field(instance).finish(),
      Self::TypeName(name) => f.debug_tuple("LocalDefinition::TypeName").field(name).finish(),
    }
  }
}

// --- SERVICE ---

/// One registered entry in a [`LocalContainer`].
pub struct LocalService {
  name: String,
  definition: LocalDefinition,
  shared: bool,
  locked: bool,
  cell: OnceCell<LocalInstance>,
}

impl LocalService {
  fn new(name: String, definition: LocalDefinition, shared: bool, locked: bool) -> Self {
    Self {
      name,
      definition,
      shared,
      locked,
      cell: OnceCell::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn definition(&self) -> &LocalDefinition {
    &self.definition
  }

  pub fn is_shared(&self) -> bool {
    self.shared
  }

  pub fn is_locked(&self) -> bool {
    self.locked
  }

  pub fn is_resolved(&self) -> bool {
    self.cell.get().is_some()
  }

  fn resolve(&self, container: &LocalContainer, args: &LocalArgs) -> LocalInstance {
    if self.shared {
      self
        .cell
        .get_or_init(|| self.instantiate(container, args))
        .clone()
    } else {
      self.instantiate(container, args)
    }
  }

  fn instantiate(&self, container: &LocalContainer, args: &LocalArgs) -> LocalInstance {
    match &self.definition {
      LocalDefinition::Factory(factory) => factory(container, args),
      LocalDefinition::Instance(instance) => instance.clone(),
      LocalDefinition::TypeName(type_name) => container.construct_named(type_name, args),
    }
  }
}

impl fmt::Debug for LocalService {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LocalService")
      .field("name", &self.name)
      .field("shared", &self.shared)
      .field("locked", &self.locked)
      .field("resolved", &self.is_resolved())
      .finish()
  }
}

// --- CONTAINER ---

#[derive(Default)]
struct LocalInner {
  services: RefCell<HashMap<String, Rc<LocalService>>>,
  types: RefCell<HashMap<String, LocalConstructorFn>>,
}

/// A single-threaded, non-thread-safe service container.
///
/// This container is for code that never crosses a thread boundary. It uses
/// a plain `HashMap` behind `RefCell` for storage and `Rc` for shared
/// ownership, which avoids the synchronization cost of
/// [`Container`](crate::Container). A key advantage is that it can hold
/// types that are not `Send` or `Sync`.
///
/// # Note on API
///
/// `LocalContainer` is a cheap `Rc` handle like its thread-safe counterpart,
/// so registration still takes `&self` and clones of the handle can be
/// passed into factories and container-aware services. The semantics of
/// `set`/`get`/`has`/`remove` and the shared/locked policies are identical
/// to the thread-safe container's.
#[derive(Clone, Default)]
pub struct LocalContainer {
  inner: Rc<LocalInner>,
}

impl LocalContainer {
  /// Creates an empty container.
  pub fn new() -> Self {
    Self::default()
  }

  fn address(&self) -> usize {
    Rc::as_ptr(&self.inner) as usize
  }

  // --- Registration ---

  /// Registers a transient, unlocked service under `name`.
  pub fn set(&self, name: impl Into<String>, definition: impl Into<LocalDefinition>) -> Result<()> {
    self.set_internal(name.into(), definition.into(), false, false)
  }

  /// Registers a shared, unlocked service under `name`.
  pub fn set_shared(
    &self,
    name: impl Into<String>,
    definition: impl Into<LocalDefinition>,
  ) -> Result<()> {
    self.set_internal(name.into(), definition.into(), true, false)
  }

  /// Registers a transient, locked service under `name`.
  pub fn set_locked(
    &self,
    name: impl Into<String>,
    definition: impl Into<LocalDefinition>,
  ) -> Result<()> {
    self.set_internal(name.into(), definition.into(), false, true)
  }

  /// Registers a shared, locked service under `name`.
  pub fn set_shared_locked(
    &self,
    name: impl Into<String>,
    definition: impl Into<LocalDefinition>,
  ) -> Result<()> {
    self.set_internal(name.into(), definition.into(), true, true)
  }

  fn set_internal(
    &self,
    name: String,
    definition: LocalDefinition,
    shared: bool,
    locked: bool,
  ) -> Result<()> {
    let mut services = self.inner.services.borrow_mut();
    match services.entry(name) {
      Entry::Occupied(mut occupied) => {
        if occupied.get().is_locked() {
          return Err(Error::Locked(occupied.key().clone()));
        }
        let service = Rc::new(LocalService::new(occupied.key().clone(), definition, shared, locked));
        debug!(service = %service.name(), shared, locked, "registered local service");
        occupied.insert(service);
      }
      Entry::Vacant(vacant) => {
        let service = Rc::new(LocalService::new(vacant.key().clone(), definition, shared, locked));
        debug!(service = %service.name(), shared, locked, "registered local service");
        vacant.insert(service);
      }
    }
    Ok(())
  }

  // --- Resolution ---

  /// Resolves the service registered under `name` with empty args.
  ///
  /// # Errors
  ///
  /// Returns [`Error::NotFound`] if nothing is registered under `name`.
  pub fn get(&self, name: &str) -> Result<LocalInstance> {
    self.get_with(name, &LocalArgs::new())
  }

  /// Resolves the service registered under `name`, forwarding `args`.
  ///
  /// # Errors
  ///
  /// Returns [`Error::NotFound`] if nothing is registered under `name`.
  pub fn get_with(&self, name: &str, args: &LocalArgs) -> Result<LocalInstance> {
    let service = self
      .inner
      .services
      .borrow()
      .get(name)
      .cloned()
      .ok_or_else(|| Error::NotFound(name.to_owned()))?;

    // The map borrow above ends before resolution, so factories can
    // re-enter the container freely.
    let instance = {
      let _guard = ResolutionGuard::new(self.address(), name);
      service.resolve(self, args)
    };

    if let Some(aware) = instance.aware_view() {
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
  pub fn get_as<T: Any>(&self, name: &str) -> Result<Rc<T>> {
    self.get_as_with(name, &LocalArgs::new())
  }

  /// Resolves `name` with `args` and downcasts the instance to `T`.
  ///
  /// # Errors
  ///
  /// Returns [`Error::NotFound`] if nothing is registered under `name`, or
  /// [`Error::TypeMismatch`] if the resolved instance is not a `T`.
  pub fn get_as_with<T: Any>(&self, name: &str, args: &LocalArgs) -> Result<Rc<T>> {
    let instance = self.get_with(name, args)?;
    let resolved = instance.type_name();
    instance.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
      name: name.to_owned(),
      requested: any::type_name::<T>(),
      resolved,
    })
  }

  // --- Inspection and removal ---

  /// Whether a service is registered under `name`.
  pub fn has(&self, name: &str) -> bool {
    self.inner.services.borrow().contains_key(name)
  }

  /// Removes the service registered under `name`. Removing an unregistered
  /// name is a no-op.
  ///
  /// # Errors
  ///
  /// Returns [`Error::RemoveLocked`] if the entry is locked.
  pub fn remove(&self, name: &str) -> Result<()> {
    let mut services = self.inner.services.borrow_mut();
    match services.entry(name.to_owned()) {
      Entry::Occupied(occupied) => {
        if occupied.get().is_locked() {
          return Err(Error::RemoveLocked(occupied.key().clone()));
        }
        occupied.remove();
        Ok(())
      }
      Entry::Vacant(_) => Ok(()),
    }
  }

  /// The registered entry under `name`, if any.
  pub fn service(&self, name: &str) -> Option<Rc<LocalService>> {
    self.inner.services.borrow().get(name).cloned()
  }

  /// The names of all registered services, in no particular order.
  pub fn names(&self) -> Vec<String> {
    self.inner.services.borrow().keys().cloned().collect()
  }

  /// The number of registered services.
  pub fn len(&self) -> usize {
    self.inner.services.borrow().len()
  }

  /// Whether no services are registered.
  pub fn is_empty(&self) -> bool {
    self.inner.services.borrow().is_empty()
  }

  // --- Type binding ---

  /// Binds `type_name` to `T`'s [`LocalConstruct`] impl.
  pub fn bind<T: LocalConstruct>(&self, type_name: impl Into<String>) {
    self.bind_constructor(
      type_name.into(),
      Rc::new(|container: &LocalContainer, args: &LocalArgs| {
        LocalInstance::new(T::construct(container, args))
      }),
    );
  }

  /// Binds `type_name` to `T`'s [`LocalConstruct`] impl with the
  /// [`LocalContainerAware`] capability recorded.
  pub fn bind_aware<T: LocalConstruct + LocalContainerAware>(&self, type_name: impl Into<String>) {
    self.bind_constructor(
      type_name.into(),
      Rc::new(|container: &LocalContainer, args: &LocalArgs| {
        LocalInstance::aware(T::construct(container, args))
      }),
    );
  }

  fn bind_constructor(&self, type_name: String, constructor: LocalConstructorFn) {
    self.inner.types.borrow_mut().insert(type_name, constructor);
  }

  fn construct_named(&self, type_name: &str, args: &LocalArgs) -> LocalInstance {
    let constructor = self
      .inner
      .types
      .borrow()
      .get(type_name)
      .cloned()
      .unwrap_or_else(|| panic!("no constructor bound for type name {:?}", type_name));
    constructor(self, args)
  }

  /// Whether two handles refer to the same registry.
  pub fn ptr_eq(a: &LocalContainer, b: &LocalContainer) -> bool {
    Rc::ptr_eq(&a.inner, &b.inner)
  }
}

impl fmt::Debug for LocalContainer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LocalContainer")
      .field("services", &self.inner.services.borrow().len())
      .field("types", &self.inner.types.borrow().len())
      .finish()
  }
}
