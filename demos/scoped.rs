use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use weft_ioc::{Injector, Qualifier};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn main() {
  let injector = Injector::new();

  // --- Singleton binding ---
  // This provider will only be called ONCE.
  injector
    .bind_qualified::<RequestTracker>(&Qualifier::named("singleton"))
    .to_provider_fn(|| {
      println!("Creating SINGLETON RequestTracker...");
      RequestTracker {
        id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
      }
    })
    .singleton();

  // --- Transient binding ---
  // This provider will be called EVERY time the service is resolved.
  injector
    .bind_qualified::<RequestTracker>(&Qualifier::named("transient"))
    .to_provider_fn(|| {
      println!("Creating TRANSIENT RequestTracker...");
      RequestTracker {
        id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
      }
    });

  println!("--- Resolving Singletons ---");
  let s1 = injector
    .get_qualified::<RequestTracker>(&Qualifier::named("singleton"))
    .unwrap();
  let s2 = injector
    .get_qualified::<RequestTracker>(&Qualifier::named("singleton"))
    .unwrap();
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert!(
    Arc::ptr_eq(&s1, &s2),
    "Singleton instances should be identical"
  );
  println!("Singleton instances are the same pointer, as expected.\n");

  println!("--- Resolving Transients ---");
  let t1 = injector
    .get_qualified::<RequestTracker>(&Qualifier::named("transient"))
    .unwrap();
  let t2 = injector
    .get_qualified::<RequestTracker>(&Qualifier::named("transient"))
    .unwrap();
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.id, t2.id);
  assert!(
    !Arc::ptr_eq(&t1, &t2),
    "Transient instances should be different"
  );
  println!("Transient instances are different pointers, as expected.");
}
