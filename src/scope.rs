//! Scope strategies: the lifecycle/caching policy wrapped around a binding's
//! provider call.
//!
//! The engine ships a transient strategy (the lazy default) and a shared
//! singleton strategy; anything implementing [`Scope`] can be attached to a
//! binding, and the engine stays agnostic to its internal policy.

use crate::core::{BindingKey, Instance, ProviderFn};
use crate::error::InjectError;
use crate::injector::Injector;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// What a scope strategy sees for one resolution: the binding key and a way
/// to invoke the binding's provider.
pub struct ScopeContext<'a> {
  key: &'a BindingKey,
  provider: &'a ProviderFn,
  injector: &'a Injector,
}

impl<'a> ScopeContext<'a> {
  pub(crate) fn new(key: &'a BindingKey, provider: &'a ProviderFn, injector: &'a Injector) -> Self {
    Self {
      key,
      provider,
      injector,
    }
  }

  /// The key being resolved.
  pub fn key(&self) -> &BindingKey {
    self.key
  }

  /// The registry this resolution runs against.
  pub fn injector(&self) -> &Injector {
    self.injector
  }

  /// Invokes the binding's provider.
  pub fn invoke_provider(&self) -> Result<Instance, InjectError> {
    (self.provider)(self.injector)
  }

  /// Invokes the binding's provider with the construction guard lifted for
  /// the source identity, re-applying it afterwards even on failure.
  pub fn invoke_provider_unguarded(&self) -> Result<Instance, InjectError> {
    let _lift = self.injector.construction_guard().lift(self.key.ident());
    (self.provider)(self.injector)
  }
}

/// A lifecycle strategy for resolving a binding.
pub trait Scope: Send + Sync + 'static {
  /// Produces an instance for the given resolution, typically by invoking
  /// the provider, possibly consulting a cache first.
  fn resolve(&self, ctx: &ScopeContext<'_>) -> Result<Instance, InjectError>;

  /// Invalidates any cached instance for the key. No-op by default. Called
  /// whenever the owning binding's provider or scope is replaced, so a stale
  /// instance is never returned after reconfiguration.
  fn reset(&self, key: &BindingKey) {
    let _ = key;
  }

  /// True if attaching this strategy should block direct construction of the
  /// bound identity outside the registry.
  fn guards_construction(&self) -> bool {
    false
  }
}

/// The default strategy: no state, no caching, a fresh instance per `get`.
#[derive(Default)]
pub struct TransientScope;

impl Scope for TransientScope {
  fn resolve(&self, ctx: &ScopeContext<'_>) -> Result<Instance, InjectError> {
    ctx.invoke_provider()
  }
}

// One shared transient strategy serves every binding that never attached an
// explicit scope.
static DEFAULT_SCOPE: Lazy<Arc<TransientScope>> = Lazy::new(|| Arc::new(TransientScope));

pub(crate) fn default_scope() -> Arc<dyn Scope> {
  DEFAULT_SCOPE.clone()
}

/// The shared strategy: at most one instance per (identity, qualifier) key.
///
/// A cache miss lifts the construction guard on the source identity, invokes
/// the provider, re-applies the guard, and stores the result; a hit returns
/// the cached instance unchanged.
#[derive(Default)]
pub struct SingletonScope {
  cache: DashMap<BindingKey, Instance>,
}

impl SingletonScope {
  pub fn new() -> Self {
    Self::default()
  }
}

impl Scope for SingletonScope {
  fn resolve(&self, ctx: &ScopeContext<'_>) -> Result<Instance, InjectError> {
    if let Some(hit) = self.cache.get(ctx.key()) {
      return Ok(hit.clone());
    }
    let built = ctx.invoke_provider_unguarded()?;
    self.cache.insert(ctx.key().clone(), built.clone());
    Ok(built)
  }

  fn reset(&self, key: &BindingKey) {
    self.cache.remove(key);
  }

  fn guards_construction(&self) -> bool {
    true
  }
}
