//! # Weft IoC
//!
//! A thread-safe, string-keyed service registry with lazy resolution.
//!
//! Weft IoC is a dependency wiring layer for applications that assemble
//! their parts at runtime. Services are registered under plain string names
//! at any point in the program's life, and nothing is constructed until the
//! first [`get`](Container::get) for a name.
//!
//! ## Core Concepts
//!
//! - **Container**: the central registry. A cheap, clonable handle over
//!   shared state, safe to pass into factories, threads, and the services
//!   themselves.
//! - **Definition**: how a name produces a value. A factory closure, a
//!   pre-built instance, or the string name of a type bound with
//!   [`Container::bind`].
//! - **Shared vs transient**: a shared service resolves once and serves the
//!   cached instance thereafter; a transient service yields a fresh instance
//!   per `get`.
//! - **Locked**: a locked entry refuses replacement and removal for the life
//!   of the container. It still resolves normally.
//! - **Container-aware services**: values registered through the `aware`
//!   heads receive a handle to their container after every resolution, via
//!   [`ContainerAware::set_container`].
//! - **Global container**: a process-wide default, accessible via
//!   [`global()`] and the [`resolve!`] / [`maybe_resolve!`] macros.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use weft_ioc::{Container, Definition};
//!
//! struct Config {
//!     database_url: String,
//! }
//!
//! struct Database {
//!     url: String,
//! }
//!
//! fn main() {
//!     let registry = Container::new();
//!
//!     // A shared config, built once on first use.
//!     registry
//!         .set_shared(
//!             "config",
//!             Definition::factory(|_c, _a| Config {
//!                 database_url: "postgres://localhost".into(),
//!             }),
//!         )
//!         .unwrap();
//!
//!     // A service whose factory pulls its own dependencies.
//!     registry
//!         .set_shared(
//!             "db",
//!             Definition::factory(|c, _a| {
//!                 let config: Arc<Config> = c.get_as("config").unwrap();
//!                 Database { url: config.database_url.clone() }
//!             }),
//!         )
//!         .unwrap();
//!
//!     let db: Arc<Database> = registry.get_as("db").unwrap();
//!     assert_eq!(db.url, "postgres://localhost");
//!
//!     // Shared entries hand out the same instance every time.
//!     let again: Arc<Database> = registry.get_as("db").unwrap();
//!     assert!(Arc::ptr_eq(&db, &again));
//! }
//! ```

mod args;
mod aware;
mod construct;
mod container;
mod core;
mod definition;
mod error;
mod global;
mod instance;
#[cfg(feature = "local")]
mod local_container;
mod macros;
mod map;
mod service;

pub use args::Args;
pub use aware::ContainerAware;
pub use construct::Construct;
pub use container::{Container, WeakContainer};
pub use definition::Definition;
pub use error::{Error, Result};
pub use global::global;
pub use instance::Instance;
#[cfg(feature = "local")]
pub use local_container::{
  LocalArgs, LocalContainer, LocalContainerAware, LocalConstruct, LocalDefinition, LocalInstance,
  LocalService,
};
pub use map::ServiceMap;
pub use service::Service;
