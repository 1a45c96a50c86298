//! Public macros for ergonomic service resolution.

/// Resolves a service from the global injector, panicking if resolution
/// fails. For a non-panicking version, use `global().get(..)` directly.
///
/// The second argument, when present, is anything convertible into a
/// [`crate::Qualifier`]; a bare string is shorthand for the named qualifier.
///
/// # Examples
///
/// ```
/// use weft_ioc::{global, resolve};
///
/// global().bind::<String>().to_instance(String::from("hello"));
///
/// let message = resolve!(String);
/// assert_eq!(*message, "hello");
/// ```
///
/// ```
/// use weft_ioc::{global, resolve};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// global().bind::<dyn Greeter>().to_shared_fn(|| Arc::new(EnglishGreeter));
///
/// let greeter = resolve!(trait Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
    // Concrete type: resolve!(MyService)
    ($type:ty) => {
        $crate::global()
            .get::<$type>()
            .unwrap_or_else(|err| {
                panic!(
                    "Failed to resolve required service {}: {}",
                    std::any::type_name::<$type>(),
                    err
                )
            })
    };

    // Qualified concrete type: resolve!(MyService, "name") or
    // resolve!(MyService, Qualifier::new().with("for", "audit"))
    ($type:ty, $qualifier:expr) => {
        $crate::global()
            .get_qualified::<$type>(&$crate::Qualifier::from($qualifier))
            .unwrap_or_else(|err| {
                panic!(
                    "Failed to resolve required service {}: {}",
                    std::any::type_name::<$type>(),
                    err
                )
            })
    };

    // Trait object: resolve!(trait MyTrait). `:ident` captures the trait
    // name so `dyn Trait` can be constructed in the expansion.
    (trait $trait_ident:ident) => {
        $crate::global()
            .get::<dyn $trait_ident>()
            .unwrap_or_else(|err| {
                panic!(
                    "Failed to resolve required trait service {}: {}",
                    std::any::type_name::<dyn $trait_ident>(),
                    err
                )
            })
    };

    // Qualified trait object: resolve!(trait MyTrait, "name")
    (trait $trait_ident:ident, $qualifier:expr) => {
        $crate::global()
            .get_qualified::<dyn $trait_ident>(&$crate::Qualifier::from($qualifier))
            .unwrap_or_else(|err| {
                panic!(
                    "Failed to resolve required trait service {}: {}",
                    std::any::type_name::<dyn $trait_ident>(),
                    err
                )
            })
    };
}
