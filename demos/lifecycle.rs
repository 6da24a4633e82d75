use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use weft_ioc::{args, Container, Definition, Instance};

struct Config {
  database_url: String,
}

struct Database {
  url: String,
  pool_size: u32,
}

fn main() {
  // Surface the registry's own debug events on stderr. Run with
  // `RUST_LOG`-style filtering via the max level below.
  tracing_subscriber::fmt()
    .with_max_level(tracing::Level::DEBUG)
    .init();

  let registry = Container::new();

  // --- Registration ---
  // Nothing is constructed here; definitions are recipes, not values.
  registry
    .set_shared(
      "config",
      Instance::new(Config {
        database_url: "postgres://localhost/app".to_string(),
      }),
    )
    .unwrap();

  registry
    .set_shared(
      "db",
      Definition::factory(|c, a| {
        let config: Arc<Config> = c.get_as("config").unwrap();
        Database {
          url: config.database_url.clone(),
          pool_size: a.get::<u32>(0).copied().unwrap_or(4),
        }
      }),
    )
    .unwrap();

  println!("registered: {:?}", registry.names());

  // --- Lazy, shared resolution ---
  // The first `get` builds the database; the second returns the cache.
  let db: Arc<Database> = registry.get_as_with("db", &args![16_u32]).unwrap();
  println!("db built against {} with pool size {}", db.url, db.pool_size);

  let again: Arc<Database> = registry.get_as("db").unwrap();
  assert!(Arc::ptr_eq(&db, &again));
  println!("second get returned the same instance (pool size {})", again.pool_size);

  // --- Transient resolution ---
  static NEXT_ID: AtomicUsize = AtomicUsize::new(1);
  registry
    .set(
      "request-id",
      Definition::factory(|_c, _a| NEXT_ID.fetch_add(1, Ordering::Relaxed)),
    )
    .unwrap();
  let id_a: Arc<usize> = registry.get_as("request-id").unwrap();
  let id_b: Arc<usize> = registry.get_as("request-id").unwrap();
  println!("transient ids differ: {} vs {}", *id_a, *id_b);
  assert_ne!(*id_a, *id_b);

  // --- Replacement and removal ---
  registry
    .set_shared("config", Instance::new(Config { database_url: "postgres://replica/app".to_string() }))
    .unwrap();
  let replica: Arc<Config> = registry.get_as("config").unwrap();
  println!("config replaced, now {}", replica.database_url);

  registry.remove("request-id").unwrap();
  println!("request-id removed, registered: {:?}", registry.names());
}
