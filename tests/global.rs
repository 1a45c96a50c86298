use serial_test::serial;
use std::sync::Arc;
use weft_ioc::{global, resolve, AsShared, Qualifier};

// --- Test Fixtures ---

// Types are unique to this file; the global injector is shared state.
trait Speaker: Send + Sync {
  fn speak(&self) -> String;
}

struct Parrot;
impl Speaker for Parrot {
  fn speak(&self) -> String {
    "Polly".to_string()
  }
}
impl AsShared<dyn Speaker> for Parrot {
  fn into_shared(self: Arc<Self>) -> Arc<dyn Speaker> {
    self
  }
}

#[derive(Debug, PartialEq, Eq)]
struct GlobalConfig {
  port: u16,
}

// --- Global Container Tests ---

#[test]
#[serial]
fn test_global_bind_and_resolve() {
  // Arrange
  global().bind::<GlobalConfig>().to_instance(GlobalConfig { port: 8080 });

  // Act
  let config = resolve!(GlobalConfig);

  // Assert
  assert_eq!(config.port, 8080);
}

#[test]
#[serial]
fn test_global_qualified_resolution() {
  // Arrange: the bare-string form is named-qualifier shorthand.
  global()
    .bind_qualified::<GlobalConfig>(&Qualifier::named("admin"))
    .to_instance(GlobalConfig { port: 9090 });

  // Act
  let config = resolve!(GlobalConfig, "admin");

  // Assert
  assert_eq!(config.port, 9090);
}

#[test]
#[serial]
fn test_global_trait_resolution() {
  // Arrange
  global().bind::<dyn Speaker>().to_provider_fn(|| Parrot);

  // Act
  let speaker = resolve!(trait Speaker);

  // Assert
  assert_eq!(speaker.speak(), "Polly");
}

#[test]
#[serial]
#[should_panic(expected = "Failed to resolve required service")]
fn test_resolve_panics_on_missing_service() {
  struct MissingService;
  let _ = resolve!(MissingService);
}

#[test]
#[serial]
#[should_panic(expected = "Failed to resolve required trait service")]
fn test_resolve_panics_on_missing_trait_service() {
  trait MissingTrait: Send + Sync {}
  let _ = resolve!(trait MissingTrait);
}
