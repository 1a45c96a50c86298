use pretty_assertions::assert_eq;
use std::sync::Arc;
use weft_ioc::{AsShared, InjectError, Injector, Qualifier};

// --- Test Fixtures ---

trait Greeter: Send + Sync {
  fn greet(&self) -> String;
}

struct EnglishGreeter;
impl Greeter for EnglishGreeter {
  fn greet(&self) -> String {
    "Hello!".to_string()
  }
}
impl AsShared<dyn Greeter> for EnglishGreeter {
  fn into_shared(self: Arc<Self>) -> Arc<dyn Greeter> {
    self
  }
}

struct GermanGreeter;
impl Greeter for GermanGreeter {
  fn greet(&self) -> String {
    "Hallo!".to_string()
  }
}
impl AsShared<dyn Greeter> for GermanGreeter {
  fn into_shared(self: Arc<Self>) -> Arc<dyn Greeter> {
    self
  }
}

#[derive(Debug, PartialEq, Eq)]
struct SimpleService {
  id: u32,
}

// --- Basic Tests ---

#[test]
fn test_bind_and_get_instance() {
  // Arrange
  let injector = Injector::new();
  injector.bind::<SimpleService>().to_instance(SimpleService { id: 101 });

  // Act
  let resolved = injector.get::<SimpleService>().unwrap();

  // Assert
  assert_eq!(resolved.id, 101);
}

#[test]
fn test_get_unbound_type_fails() {
  // Arrange
  let injector = Injector::new();

  // Act
  let err = injector.get::<SimpleService>().unwrap_err();

  // Assert
  assert!(matches!(err, InjectError::UnboundType { .. }));
}

#[test]
fn test_bind_without_provider_fails_on_get() {
  // Arrange: a binding exists, but nothing was configured on it.
  let injector = Injector::new();
  injector.bind::<SimpleService>();

  // Act
  let err = injector.get::<SimpleService>().unwrap_err();

  // Assert
  assert!(matches!(err, InjectError::UnboundType { .. }));
  assert!(!injector.is_bound::<SimpleService>());
}

#[test]
fn test_bind_is_idempotent() {
  // Arrange
  let injector = Injector::new();

  // Act: two binds for the same pair.
  let first = injector.bind::<SimpleService>();
  let second = injector.bind::<SimpleService>();

  // Assert: both configurators are backed by the identical record.
  assert!(first.is_same(&second));

  // A different qualifier gets a different record.
  let qualified = injector.bind_qualified::<SimpleService>(&Qualifier::named("other"));
  assert!(!first.is_same(&qualified));
}

#[test]
fn test_override_binding_in_place() {
  // Arrange
  let injector = Injector::new();
  injector
    .bind::<dyn Greeter>()
    .to_provider_fn(|| EnglishGreeter);
  assert_eq!(injector.get::<dyn Greeter>().unwrap().greet(), "Hello!");

  // Act: re-bind the same pair to a different implementation.
  injector
    .bind::<dyn Greeter>()
    .to_provider_fn(|| GermanGreeter);

  // Assert
  assert_eq!(injector.get::<dyn Greeter>().unwrap().greet(), "Hallo!");
}

#[test]
fn test_trait_object_via_shared_factory() {
  // Arrange
  let injector = Injector::new();
  injector
    .bind::<dyn Greeter>()
    .to_shared_fn(|| Arc::new(EnglishGreeter));

  // Act
  let greeter = injector.get::<dyn Greeter>().unwrap();

  // Assert
  assert_eq!(greeter.greet(), "Hello!");
}

#[test]
fn test_qualified_bindings_are_independent() {
  // Arrange
  let injector = Injector::new();
  injector.bind::<SimpleService>().to_instance(SimpleService { id: 1 });
  injector
    .bind_qualified::<SimpleService>(&Qualifier::named("backup"))
    .to_instance(SimpleService { id: 2 });

  // Act / Assert
  assert_eq!(injector.get::<SimpleService>().unwrap().id, 1);
  assert_eq!(
    injector
      .get_qualified::<SimpleService>(&Qualifier::named("backup"))
      .unwrap()
      .id,
    2
  );
  assert!(injector.is_bound::<SimpleService>());
  assert!(injector.is_bound_qualified::<SimpleService>(&Qualifier::named("backup")));
  assert!(!injector.is_bound_qualified::<SimpleService>(&Qualifier::named("missing")));
}

#[test]
fn test_get_all_in_registration_order() {
  // Arrange: three bindings under one logical type, registered in a known
  // order across distinct qualifiers.
  let injector = Injector::new();
  injector.bind::<SimpleService>().to_instance(SimpleService { id: 10 });
  injector
    .bind_qualified::<SimpleService>(&Qualifier::named("second"))
    .to_instance(SimpleService { id: 20 });
  injector
    .bind_qualified::<SimpleService>(&Qualifier::named("third"))
    .to_instance(SimpleService { id: 30 });

  // Act
  let all = injector.get_all::<SimpleService>().unwrap();

  // Assert
  let ids: Vec<u32> = all.iter().map(|(_, s)| s.id).collect();
  assert_eq!(ids, vec![10, 20, 30]);
  assert_eq!(all[1].0, Qualifier::named("second"));
}

#[test]
fn test_get_all_empty_for_unknown_type() {
  let injector = Injector::new();
  assert!(injector.get_all::<SimpleService>().unwrap().is_empty());
}

#[test]
fn test_failed_get_leaves_no_partial_state() {
  // Arrange
  let injector = Injector::new();
  injector.bind::<SimpleService>();
  assert!(injector.get::<SimpleService>().is_err());

  // Act: correct the configuration and retry.
  injector.bind::<SimpleService>().to_instance(SimpleService { id: 5 });

  // Assert
  assert_eq!(injector.get::<SimpleService>().unwrap().id, 5);
}
