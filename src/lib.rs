//! # Weft IoC
//!
//! A qualified, scope-driven dependency resolution engine for Rust.
//!
//! Weft maps a logical type, optionally disambiguated by a [`Qualifier`], to
//! a construction strategy, and resolves object graphs on demand under a
//! pluggable lifecycle policy. Configuration is dynamic: bindings can be
//! created, re-targeted, re-scoped, snapshotted, and restored at any point
//! during the application's lifetime.
//!
//! ## Core Concepts
//!
//! - **Injector**: the registry holding one binding per (type, qualifier)
//!   pair; [`global()`] exposes a static, process-wide instance.
//! - **Binding**: the stored configuration for one pair, mutated in place by
//!   the configurator `bind` returns (`to`, `to_instance`, `to_provider_fn`,
//!   `in_scope`, `with_params`, ...).
//! - **Scope**: the lifecycle strategy wrapped around the binding's provider
//!   call; transient by default, shared-singleton via
//!   [`Binding::singleton`], or any custom [`Scope`] implementation.
//! - **Factory**: builds [`Construct`] types from their ordered constructor
//!   dependencies, assembled from out-of-order discovery facts.
//! - **Field injection**: [`InjectedField`] slots resolve lazily on first
//!   read and cache per instance.
//! - **Snapshot/restore**: a binding's provider and scope can be captured
//!   and reverted, for test harnesses and reversible reconfiguration.
//!
//! ## Quick Start
//!
//! ```
//! use weft_ioc::{AsShared, Injector, Qualifier};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FixedClock(u64);
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 { self.0 }
//! }
//! impl AsShared<dyn Clock> for FixedClock {
//!     fn into_shared(self: Arc<Self>) -> Arc<dyn Clock> { self }
//! }
//!
//! let injector = Injector::new();
//!
//! // One default clock, one qualified for auditing, both singleton-scoped.
//! injector.bind::<dyn Clock>().to_provider_fn(|| FixedClock(0)).singleton();
//! injector
//!     .bind_qualified::<dyn Clock>(&Qualifier::named("audit"))
//!     .to_provider_fn(|| FixedClock(99))
//!     .singleton();
//!
//! let clock = injector.get::<dyn Clock>().unwrap();
//! let audit = injector.get_qualified::<dyn Clock>(&Qualifier::named("audit")).unwrap();
//! assert_eq!(clock.now(), 0);
//! assert_eq!(audit.now(), 99);
//! ```

mod binding;
mod core;
mod error;
mod factory;
mod fields;
mod global;
mod guard;
mod identity;
mod injector;
mod macros;
mod qualifier;
mod scope;

pub use binding::{AsShared, Binding, DynBinding, InstanceProvider};
pub use crate::core::{erase, unerase, BindingKey, Instance, ProviderFn};
pub use error::InjectError;
pub use factory::{Construct, ConstructorArgs, ParamSpec};
pub use fields::InjectedField;
pub use global::global;
pub use guard::ConstructionGuard;
pub use identity::{TypeHandle, TypeIdent};
pub use injector::Injector;
pub use qualifier::{Qualifier, QualifierValue};
pub use scope::{Scope, ScopeContext, SingletonScope, TransientScope};
