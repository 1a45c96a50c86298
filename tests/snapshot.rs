use pretty_assertions::assert_eq;
use std::sync::Arc;
use weft_ioc::{InjectError, Injector, Qualifier};

// --- Test Fixtures ---

struct Greeting {
  text: &'static str,
}

// --- Snapshot / Restore Tests ---

#[test]
fn test_snapshot_restore_round_trip() {
  // Arrange
  let injector = Injector::new();
  injector.bind::<Greeting>().to_provider_fn(|| Greeting { text: "X" });
  injector.snapshot::<Greeting>();

  // Act: re-bind past the snapshot, then revert.
  injector.bind::<Greeting>().to_provider_fn(|| Greeting { text: "Y" });
  assert_eq!(injector.get::<Greeting>().unwrap().text, "Y");
  injector.restore::<Greeting>().unwrap();

  // Assert
  assert_eq!(injector.get::<Greeting>().unwrap().text, "X");
}

#[test]
fn test_restore_without_snapshot_fails() {
  // Arrange
  let injector = Injector::new();
  injector.bind::<Greeting>().to_provider_fn(|| Greeting { text: "X" });

  // Act
  let err = injector.restore::<Greeting>().unwrap_err();

  // Assert
  assert!(matches!(err, InjectError::NoSnapshotRecorded { .. }));
}

#[test]
fn test_second_snapshot_overwrites_the_first() {
  // Arrange: one ledger slot per identity.
  let injector = Injector::new();
  injector.bind::<Greeting>().to_provider_fn(|| Greeting { text: "X" });
  injector.snapshot::<Greeting>();
  injector.bind::<Greeting>().to_provider_fn(|| Greeting { text: "Y" });
  injector.snapshot::<Greeting>();

  // Act
  injector.bind::<Greeting>().to_provider_fn(|| Greeting { text: "Z" });
  injector.restore::<Greeting>().unwrap();

  // Assert: the later snapshot won.
  assert_eq!(injector.get::<Greeting>().unwrap().text, "Y");
}

#[test]
fn test_restore_resets_singleton_cache() {
  // Arrange: a singleton-scoped binding with a cached instance.
  let injector = Injector::new();
  injector
    .bind::<Greeting>()
    .to_provider_fn(|| Greeting { text: "X" })
    .singleton();
  let cached = injector.get::<Greeting>().unwrap();
  injector.snapshot::<Greeting>();

  // Act: reconfigure, then restore.
  injector.bind::<Greeting>().to_provider_fn(|| Greeting { text: "Y" });
  injector.restore::<Greeting>().unwrap();

  // Assert: the snapshotted provider and scope are back, and the restore
  // invalidated the cache, so the instance is rebuilt rather than stale.
  let restored = injector.get::<Greeting>().unwrap();
  assert_eq!(restored.text, "X");
  assert!(!Arc::ptr_eq(&cached, &restored));
  // The restored scope still caches.
  assert!(Arc::ptr_eq(&restored, &injector.get::<Greeting>().unwrap()));
}

#[test]
fn test_snapshot_is_scoped_to_the_qualified_binding() {
  // Arrange: snapshot taken for a qualified pair.
  let injector = Injector::new();
  let backup = Qualifier::named("backup");
  injector
    .bind_qualified::<Greeting>(&backup)
    .to_provider_fn(|| Greeting { text: "X" });
  injector.snapshot_qualified::<Greeting>(&backup);
  injector
    .bind_qualified::<Greeting>(&backup)
    .to_provider_fn(|| Greeting { text: "Y" });

  // Act
  injector.restore_qualified::<Greeting>(&backup).unwrap();

  // Assert
  assert_eq!(injector.get_qualified::<Greeting>(&backup).unwrap().text, "X");
}
