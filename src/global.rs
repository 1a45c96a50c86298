//! The global injector instance and access function.

use crate::injector::Injector;
use once_cell::sync::Lazy;

// The one and only global injector. Created on first access.
static GLOBAL_INJECTOR: Lazy<Injector> = Lazy::new(Injector::default);

/// Provides a reference to the global injector.
///
/// Registration and resolution can happen from anywhere in an application;
/// the [`crate::resolve!`] macro goes through this instance.
///
/// # Examples
///
/// ```
/// use weft_ioc::global;
///
/// fn register_services() {
///   global().bind::<String>().to_instance(String::from("Hello from global!"));
/// }
/// ```
pub fn global() -> &'static Injector {
  &GLOBAL_INJECTOR
}
