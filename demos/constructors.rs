use std::sync::Arc;

use weft_ioc::{args, Args, Construct, Container, Instance};

struct Mailer {
  transport: String,
  from: String,
}

impl Construct for Mailer {
  fn construct(container: &Container, args: &Args) -> Self {
    // Constructors pull fixed dependencies from the container and tuning
    // from the caller's args.
    let transport: Arc<String> = container.get_as("smtp").unwrap();
    Mailer {
      transport: (*transport).clone(),
      from: args
        .get::<String>(0)
        .cloned()
        .unwrap_or_else(|| "noreply@example.com".to_string()),
    }
  }
}

fn main() {
  let registry = Container::new();

  registry
    .set_shared("smtp", Instance::new("smtp://mail.internal:25".to_string()))
    .unwrap();

  // Bind the type name once, then register services against it by string.
  registry.bind::<Mailer>("app.mailer");
  registry.set("mailer", "app.mailer").unwrap();

  let default_mailer: Arc<Mailer> = registry.get_as("mailer").unwrap();
  println!(
    "default mailer sends from {} via {}",
    default_mailer.from, default_mailer.transport
  );

  let alerts: Arc<Mailer> = registry
    .get_as_with("mailer", &args!["alerts@example.com".to_string()])
    .unwrap();
  println!(
    "alert mailer sends from {} via {}",
    alerts.from, alerts.transport
  );
}
