//! Public macros for ergonomic service resolution.

/// Resolves a named service from the global container, panicking on failure.
///
/// This is the terse form for dependencies the program cannot run without.
/// The bare form yields an [`Instance`](crate::Instance); add `=> Type` to
/// downcast in the same breath.
///
/// # Panics
///
/// Panics if the service is not registered or (in the typed form) resolves
/// to a different type. For a non-panicking version use
/// [`maybe_resolve!`](crate::maybe_resolve) or `global().get(...)` directly.
///
/// # Examples
///
/// ```
/// use weft_ioc::{global, resolve, Definition};
///
/// global()
///     .set_shared("macro.greeting", Definition::factory(|_c, _a| String::from("hello")))
///     .unwrap();
///
/// let greeting = resolve!("macro.greeting" => String);
/// assert_eq!(greeting.as_str(), "hello");
/// ```
#[macro_export]
macro_rules! resolve {
    // Arm for an untyped instance: resolve!("db")
    ($name:expr) => {
        $crate::resolve_from!($crate::global(), $name)
    };

    // Arm for a typed resolution: resolve!("db" => Database)
    ($name:expr => $type:ty) => {
        $crate::resolve_from!($crate::global(), $name => $type)
    };
}

/// Resolves a named service from the global container, yielding `None` on
/// failure instead of panicking.
///
/// # Examples
///
/// ```
/// use weft_ioc::maybe_resolve;
///
/// assert!(maybe_resolve!("macro.never-registered").is_none());
/// ```
#[macro_export]
macro_rules! maybe_resolve {
    ($name:expr) => {
        $crate::maybe_resolve_from!($crate::global(), $name)
    };

    ($name:expr => $type:ty) => {
        $crate::maybe_resolve_from!($crate::global(), $name => $type)
    };
}

/// Resolves a named service from an explicit container, panicking on failure.
///
/// The container form of [`resolve!`](crate::resolve), for code that passes
/// [`Container`](crate::Container) handles around instead of touching the
/// global one.
///
/// # Panics
///
/// Panics if the service is not registered or (in the typed form) resolves
/// to a different type.
///
/// # Examples
///
/// ```
/// use weft_ioc::{resolve_from, Container, Definition};
///
/// let registry = Container::new();
/// registry
///     .set("port", Definition::factory(|_c, _a| 8080u16))
///     .unwrap();
///
/// let port = resolve_from!(&registry, "port" => u16);
/// assert_eq!(*port, 8080);
/// ```
#[macro_export]
macro_rules! resolve_from {
    ($container:expr, $name:expr) => {
        $container.get($name).unwrap_or_else(|error| {
            panic!("Failed to resolve required service {:?}: {}", $name, error)
        })
    };

    ($container:expr, $name:expr => $type:ty) => {
        $container.get_as::<$type>($name).unwrap_or_else(|error| {
            panic!("Failed to resolve required service {:?}: {}", $name, error)
        })
    };
}

/// Resolves a named service from an explicit container, yielding `None` on
/// failure instead of panicking.
///
/// # Examples
///
/// ```
/// use weft_ioc::{maybe_resolve_from, Container};
///
/// let registry = Container::new();
/// assert!(maybe_resolve_from!(&registry, "missing").is_none());
/// ```
#[macro_export]
macro_rules! maybe_resolve_from {
    ($container:expr, $name:expr) => {
        $container.get($name).ok()
    };

    ($container:expr, $name:expr => $type:ty) => {
        $container.get_as::<$type>($name).ok()
    };
}

/// Builds an [`Args`](crate::Args) bundle from a list of values.
///
/// Each value is pushed in order and retrieved positionally by the factory
/// or constructor with [`Args::get`](crate::Args::get).
///
/// # Examples
///
/// ```
/// use weft_ioc::args;
///
/// let args = args!["postgres://localhost".to_string(), 5u32];
/// assert_eq!(args.len(), 2);
/// assert_eq!(args.get::<u32>(1), Some(&5));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };

    ($($value:expr),+ $(,)?) => {{
        let mut args = $crate::Args::new();
        $(args.push($value);)+
        args
    }};
}
