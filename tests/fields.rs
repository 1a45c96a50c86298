use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use weft_ioc::{InjectError, InjectedField, Injector, Qualifier};

// --- Test Fixtures ---

#[derive(Debug)]
struct Repository {
  id: usize,
}

struct OtherDep;

struct Service {
  repo: InjectedField<Repository>,
}

impl Service {
  fn new() -> Self {
    Self {
      repo: InjectedField::new::<Service>("repo"),
    }
  }
}

// --- Field Injection Tests ---

#[test]
fn test_first_read_resolves_and_caches() {
  // Arrange: a transient provider that counts how often it runs.
  let hits = Arc::new(AtomicUsize::new(0));
  let injector = Injector::new();
  let h = hits.clone();
  injector.bind::<Repository>().to_provider_fn(move || Repository {
    id: h.fetch_add(1, Ordering::SeqCst),
  });
  injector.install::<Service, Repository>("repo", Qualifier::default());
  let service = Service::new();
  assert!(!service.repo.is_cached());

  // Act: two reads.
  let first = service.repo.get(&injector).unwrap();
  let second = service.repo.get(&injector).unwrap();

  // Assert: resolved exactly once, same reference both times.
  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(hits.load(Ordering::SeqCst), 1);
  assert!(service.repo.is_cached());
}

#[test]
fn test_cache_is_per_instance() {
  // Arrange: a transient dependency and two owner instances.
  let injector = Injector::new();
  let counter = Arc::new(AtomicUsize::new(0));
  let c = counter.clone();
  injector.bind::<Repository>().to_provider_fn(move || Repository {
    id: c.fetch_add(1, Ordering::SeqCst),
  });
  injector.install::<Service, Repository>("repo", Qualifier::default());
  let one = Service::new();
  let two = Service::new();

  // Act / Assert: each instance resolves its own copy.
  assert_ne!(one.repo.get(&injector).unwrap().id, two.repo.get(&injector).unwrap().id);
}

#[test]
fn test_explicit_write_overrides_without_resolution() {
  // Arrange
  let hits = Arc::new(AtomicUsize::new(0));
  let injector = Injector::new();
  let h = hits.clone();
  injector.bind::<Repository>().to_provider_fn(move || Repository {
    id: 100 + h.fetch_add(1, Ordering::SeqCst),
  });
  injector.install::<Service, Repository>("repo", Qualifier::default());
  let service = Service::new();

  // Act: write before any read.
  service.repo.set(Arc::new(Repository { id: 7 }));

  // Assert: reads return the written value, nothing was resolved.
  assert_eq!(service.repo.get(&injector).unwrap().id, 7);
  assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_installed_qualifier_routes_resolution() {
  // Arrange: only the qualified binding exists.
  let injector = Injector::new();
  injector
    .bind_qualified::<Repository>(&Qualifier::named("replica"))
    .to_provider_fn(|| Repository { id: 42 });
  injector.install::<Service, Repository>("repo", Qualifier::named("replica"));
  let service = Service::new();

  // Act / Assert
  assert_eq!(service.repo.get(&injector).unwrap().id, 42);
}

#[test]
fn test_uninstalled_field_falls_back_to_empty_qualifier() {
  // Arrange: no plan for (Service, "repo").
  let injector = Injector::new();
  injector.bind::<Repository>().to_provider_fn(|| Repository { id: 3 });
  let service = Service::new();

  // Act / Assert
  assert_eq!(service.repo.get(&injector).unwrap().id, 3);
}

#[test]
fn test_plan_type_mismatch_is_refused() {
  // Arrange: the plan names a different dependency than the slot's type.
  let injector = Injector::new();
  injector.bind::<Repository>().to_provider_fn(|| Repository { id: 1 });
  injector.install::<Service, OtherDep>("repo", Qualifier::default());
  let service = Service::new();

  // Act
  let err = service.repo.get(&injector).unwrap_err();

  // Assert
  assert!(matches!(err, InjectError::InvalidType { .. }));
}
