use weft_ioc::Injector;

// Snapshot/restore: swap a binding out (say, for a test double) and revert
// to the captured configuration afterwards.

struct Mailer {
  endpoint: &'static str,
}

fn main() {
  let injector = Injector::new();

  injector
    .bind::<Mailer>()
    .to_provider_fn(|| Mailer {
      endpoint: "smtp://mail.internal:25",
    })
    .singleton();
  println!("production: {}", injector.get::<Mailer>().unwrap().endpoint);

  // Capture the current provider and scope, then override.
  injector.snapshot::<Mailer>();
  injector.bind::<Mailer>().to_provider_fn(|| Mailer {
    endpoint: "mock://captured",
  });
  println!("overridden: {}", injector.get::<Mailer>().unwrap().endpoint);

  // Revert. The displaced scope's cache entry is invalidated, so the next
  // resolution rebuilds through the restored provider.
  injector.restore::<Mailer>().unwrap();
  println!("restored:   {}", injector.get::<Mailer>().unwrap().endpoint);

  assert_eq!(injector.get::<Mailer>().unwrap().endpoint, "smtp://mail.internal:25");
}
