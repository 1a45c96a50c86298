//! Binding records and the configurator surface returned by `bind`.
//!
//! A binding is the unit of configuration: one record per (logical identity,
//! normalized qualifier) pair, created on the first `bind` call for the pair
//! and mutated in place by every later one. The configurators hand out here
//! are thin views over that shared record, so re-binding a pair always talks
//! to the same state.

use crate::core::{erase, unerase, BindingKey, ProviderFn};
use crate::factory::{Construct, ParamSpec};
use crate::identity::TypeIdent;
use crate::injector::Injector;
use crate::qualifier::Qualifier;
use crate::scope::{Scope, SingletonScope};
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::sync::Arc;

/// Coercion from a concrete shared instance to the binding's source type.
///
/// The blanket identity impl covers concrete-to-self bindings; binding a
/// concrete type under a trait-object source takes a one-line impl:
///
/// ```
/// use weft_ioc::AsShared;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter {
///   fn greet(&self) -> String { "Hello!".into() }
/// }
///
/// impl AsShared<dyn Greeter> for EnglishGreeter {
///   fn into_shared(self: Arc<Self>) -> Arc<dyn Greeter> { self }
/// }
/// ```
pub trait AsShared<S: ?Sized>: Send + Sync + 'static {
  fn into_shared(self: Arc<Self>) -> Arc<S>;
}

impl<T: Send + Sync + 'static> AsShared<T> for T {
  fn into_shared(self: Arc<Self>) -> Arc<T> {
    self
  }
}

/// A reusable provider object, for construction strategies that carry state
/// of their own. The zero-argument closure form is
/// [`Binding::to_provider_fn`].
pub trait InstanceProvider: Send + Sync + 'static {
  type Output: Send + Sync + 'static;

  fn provide(&self, injector: &Injector) -> Self::Output;
}

pub(crate) struct BindingState {
  key: BindingKey,
  qualifier: Qualifier,
  target: Mutex<TypeIdent>,
  provider: Mutex<Option<ProviderFn>>,
  scope: Mutex<Option<Arc<dyn Scope>>>,
  // Explicit `with_params` override; `None` falls back to discovered params.
  params: Mutex<Option<Vec<ParamSpec>>>,
}

impl BindingState {
  pub(crate) fn new(key: BindingKey, qualifier: Qualifier) -> Self {
    let target = key.ident();
    Self {
      key,
      qualifier,
      target: Mutex::new(target),
      provider: Mutex::new(None),
      scope: Mutex::new(None),
      params: Mutex::new(None),
    }
  }

  pub(crate) fn key(&self) -> &BindingKey {
    &self.key
  }

  pub(crate) fn qualifier(&self) -> &Qualifier {
    &self.qualifier
  }

  pub(crate) fn provider(&self) -> Option<ProviderFn> {
    self.provider.lock().clone()
  }

  pub(crate) fn scope(&self) -> Option<Arc<dyn Scope>> {
    self.scope.lock().clone()
  }

  /// Returns the attached scope, attaching the shared transient default on
  /// first resolution.
  pub(crate) fn scope_or_default(&self) -> Arc<dyn Scope> {
    let mut slot = self.scope.lock();
    slot
      .get_or_insert_with(crate::scope::default_scope)
      .clone()
  }

  pub(crate) fn params_override(&self) -> Option<Vec<ParamSpec>> {
    self.params.lock().clone()
  }

  /// Replaces the provider and invalidates whatever the current scope has
  /// cached for this key.
  pub(crate) fn replace_provider(&self, provider: Option<ProviderFn>) {
    *self.provider.lock() = provider;
    if let Some(scope) = self.scope() {
      scope.reset(&self.key);
    }
  }

  /// Replaces the scope, resetting the displaced one and keeping the
  /// construction guard in step with what the strategies ask for.
  pub(crate) fn replace_scope(&self, injector: &Injector, scope: Arc<dyn Scope>) {
    let displaced = self.scope.lock().replace(scope.clone());
    if let Some(old) = displaced {
      old.reset(&self.key);
      if old.guards_construction() {
        injector.construction_guard().unblock(self.key.ident());
      }
    }
    if scope.guards_construction() {
      injector.construction_guard().block(self.key.ident());
    }
  }

  pub(crate) fn set_target(&self, target: TypeIdent) {
    *self.target.lock() = target;
  }

  pub(crate) fn target(&self) -> TypeIdent {
    *self.target.lock()
  }

  pub(crate) fn set_params(&self, params: Vec<ParamSpec>) {
    *self.params.lock() = Some(params);
  }
}

/// The erased configurator: what the discovery layer drives when it only
/// holds runtime type handles.
pub struct DynBinding<'a> {
  injector: &'a Injector,
  state: Arc<BindingState>,
}

impl<'a> DynBinding<'a> {
  pub(crate) fn new(injector: &'a Injector, state: Arc<BindingState>) -> Self {
    Self { injector, state }
  }

  pub(crate) fn state(&self) -> &Arc<BindingState> {
    &self.state
  }

  /// The registry key this binding is stored under.
  pub fn key(&self) -> &BindingKey {
    self.state.key()
  }

  /// The qualifier the binding was registered with.
  pub fn qualifier(&self) -> &Qualifier {
    self.state.qualifier()
  }

  /// The concrete identity this binding instantiates.
  pub fn target(&self) -> TypeIdent {
    self.state.target()
  }

  /// True if both configurators are backed by the same record.
  pub fn is_same(&self, other: &DynBinding<'_>) -> bool {
    Arc::ptr_eq(&self.state, &other.state)
  }

  /// Installs an erased provider.
  pub fn provider(self, provider: ProviderFn) -> Self {
    self.state.replace_provider(Some(provider));
    self
  }

  /// Attaches a lifecycle strategy.
  pub fn in_scope(self, scope: Arc<dyn Scope>) -> Self {
    self.state.replace_scope(self.injector, scope);
    self
  }

  /// Shorthand for attaching a fresh shared-singleton strategy.
  pub fn singleton(self) -> Self {
    self.in_scope(Arc::new(SingletonScope::new()))
  }

  /// Overrides auto-discovered constructor parameters entirely.
  pub fn with_params(self, params: impl IntoIterator<Item = ParamSpec>) -> Self {
    self.state.set_params(params.into_iter().collect());
    self
  }
}

/// The typed configurator returned by [`Injector::bind`].
///
/// `S` is the binding's source: the logical type resolution requests will
/// name. It may be unsized (`bind::<dyn Service>()`).
pub struct Binding<'a, S: ?Sized> {
  raw: DynBinding<'a>,
  _marker: PhantomData<fn(&S)>,
}

impl<'a, S: ?Sized + Send + Sync + 'static> Binding<'a, S> {
  pub(crate) fn new(raw: DynBinding<'a>) -> Self {
    Self {
      raw,
      _marker: PhantomData,
    }
  }

  /// The registry key this binding is stored under.
  pub fn key(&self) -> &BindingKey {
    self.raw.key()
  }

  /// The qualifier the binding was registered with.
  pub fn qualifier(&self) -> &Qualifier {
    self.raw.qualifier()
  }

  /// The concrete identity this binding instantiates.
  pub fn target(&self) -> TypeIdent {
    self.raw.target()
  }

  /// True if both configurators are backed by the same record.
  pub fn is_same(&self, other: &Binding<'_, S>) -> bool {
    self.raw.is_same(&other.raw)
  }

  /// Drops the source type, yielding the erased configurator.
  pub fn into_dyn(self) -> DynBinding<'a> {
    self.raw
  }

  /// Binds the source to a concrete implementation built by the factory:
  /// each resolution constructs `U` from its ordered constructor
  /// dependencies (unless a scope caches the result).
  pub fn to<U: Construct + AsShared<S>>(self) -> Self {
    let target = TypeIdent::of::<U>();
    self.raw.injector.register::<U>();
    self.raw.state.set_target(target);
    let key = self.raw.state.key().clone();
    let provider: ProviderFn = Arc::new(move |injector: &Injector| {
      let built = injector.build_for_binding(target, &key)?;
      let concrete = unerase::<U>(&built)?;
      Ok(erase(concrete.into_shared()))
    });
    self.raw.state.replace_provider(Some(provider));
    self
  }

  /// Pins a fixed value: every resolution yields this exact instance.
  pub fn to_instance<U: AsShared<S>>(self, value: U) -> Self {
    let pinned = erase(Arc::new(value).into_shared());
    let provider: ProviderFn = Arc::new(move |_: &Injector| Ok(pinned.clone()));
    self.raw.state.replace_provider(Some(provider));
    self
  }

  /// Installs a zero-argument factory function.
  pub fn to_provider_fn<U, F>(self, factory: F) -> Self
  where
    U: AsShared<S>,
    F: Fn() -> U + Send + Sync + 'static,
  {
    let provider: ProviderFn = Arc::new(move |_: &Injector| Ok(erase(Arc::new(factory()).into_shared())));
    self.raw.state.replace_provider(Some(provider));
    self
  }

  /// Installs a provider object with registry access.
  pub fn to_provider<P>(self, provider: P) -> Self
  where
    P: InstanceProvider,
    P::Output: AsShared<S>,
  {
    let provider: ProviderFn = Arc::new(move |injector: &Injector| {
      Ok(erase(Arc::new(provider.provide(injector)).into_shared()))
    });
    self.raw.state.replace_provider(Some(provider));
    self
  }

  /// Installs a factory already producing the shared source type, the shape
  /// trait-object registrations usually take.
  pub fn to_shared_fn<F>(self, factory: F) -> Self
  where
    F: Fn() -> Arc<S> + Send + Sync + 'static,
  {
    let provider: ProviderFn = Arc::new(move |_: &Injector| Ok(erase(factory())));
    self.raw.state.replace_provider(Some(provider));
    self
  }

  /// Attaches a lifecycle strategy.
  pub fn in_scope(self, scope: Arc<dyn Scope>) -> Self {
    self.raw.state.replace_scope(self.raw.injector, scope);
    self
  }

  /// Shorthand for attaching a fresh shared-singleton strategy.
  pub fn singleton(self) -> Self {
    self.in_scope(Arc::new(SingletonScope::new()))
  }

  /// Overrides auto-discovered constructor parameters entirely.
  pub fn with_params(self, params: impl IntoIterator<Item = ParamSpec>) -> Self {
    self.raw.state.set_params(params.into_iter().collect());
    self
  }
}
