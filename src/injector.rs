//! The `Injector`: registry, factory driver, and snapshot ledger.

use crate::binding::{Binding, BindingState, DynBinding};
use crate::core::{unerase, BindingKey, Instance, ProviderFn, ResolutionGuard};
use crate::error::InjectError;
use crate::factory::{Construct, ConstructorArgs, FactoryRecord, ParamSpec};
use crate::fields::FieldPlan;
use crate::guard::ConstructionGuard;
use crate::identity::{TypeHandle, TypeIdent};
use crate::qualifier::Qualifier;
use crate::scope::{Scope, ScopeContext};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, trace};

struct SnapshotRecord {
  provider: Option<ProviderFn>,
  scope: Option<Arc<dyn Scope>>,
}

/// The dependency resolution engine.
///
/// Holds one binding per (logical identity, normalized qualifier) pair,
/// the constructor records pushed in by the discovery layer, the field
/// injection plans, the construction guard, and the snapshot ledger.
///
/// Every operation runs to completion synchronously on the calling thread.
/// Storage is safe to share, but no coordination is promised between a
/// configuration call and a resolution racing it; serialize reconfiguration
/// externally if that matters to you.
#[derive(Default)]
pub struct Injector {
  bindings: DashMap<BindingKey, Arc<BindingState>>,
  // Binding keys per identity, in registration order, for `get_all`.
  registration_order: DashMap<TypeIdent, Vec<BindingKey>>,
  factories: DashMap<TypeIdent, Arc<FactoryRecord>>,
  field_plans: DashMap<(TypeIdent, &'static str), FieldPlan>,
  guard: ConstructionGuard,
  snapshots: DashMap<TypeIdent, SnapshotRecord>,
}

impl Injector {
  /// Creates a new, empty injector.
  pub fn new() -> Self {
    Self::default()
  }

  /// The construction guard owned by this registry.
  pub fn construction_guard(&self) -> &ConstructionGuard {
    &self.guard
  }

  // --- BINDING ---

  /// Get-or-create the binding for `T` under the empty qualifier.
  pub fn bind<T: ?Sized + Any + Send + Sync>(&self) -> Binding<'_, T> {
    self.bind_qualified::<T>(&Qualifier::default())
  }

  /// Get-or-create the binding for `T` under a qualifier. Calling this twice
  /// for the same pair hands out configurators over the identical record.
  pub fn bind_qualified<T: ?Sized + Any + Send + Sync>(&self, qualifier: &Qualifier) -> Binding<'_, T> {
    let state = self.bind_state(TypeIdent::of::<T>(), qualifier);
    Binding::new(DynBinding::new(self, state))
  }

  /// Handle-driven get-or-create, canonicalizing the handle first. The
  /// handle's own qualifier (from its outermost synthetic wrapper) is used
  /// when it carries one.
  pub fn bind_dyn(&self, handle: &TypeHandle) -> Result<DynBinding<'_>, InjectError> {
    let ident = handle.canonical()?;
    let qualifier = handle.qualifier().cloned().unwrap_or_default();
    Ok(DynBinding::new(self, self.bind_state(ident, &qualifier)))
  }

  fn bind_state(&self, ident: TypeIdent, qualifier: &Qualifier) -> Arc<BindingState> {
    let key = BindingKey::new(ident, qualifier);
    let (state, created) = match self.bindings.entry(key.clone()) {
      Entry::Occupied(existing) => (existing.get().clone(), false),
      Entry::Vacant(slot) => {
        let state = Arc::new(BindingState::new(key.clone(), qualifier.clone()));
        slot.insert(state.clone());
        (state, true)
      }
    };
    if created {
      self.registration_order.entry(ident).or_default().push(key.clone());
      // Implicit self-binding: a type whose constructor is already known
      // gets a default factory provider targeting itself, so a plain `get`
      // succeeds without an explicit `to`. Happens at most once per pair.
      if self.factories.contains_key(&ident) {
        let provider: ProviderFn = Arc::new(move |injector: &Injector| injector.build_for_binding(ident, &key));
        state.replace_provider(Some(provider));
      }
      trace!(type_name = ident.name(), qualifier = %qualifier, "binding created");
    }
    state
  }

  /// True if a binding with a configured provider exists for the pair.
  pub fn is_bound<T: ?Sized + Any>(&self) -> bool {
    self.is_bound_qualified::<T>(&Qualifier::default())
  }

  /// Qualified form of [`is_bound`](Self::is_bound).
  pub fn is_bound_qualified<T: ?Sized + Any>(&self, qualifier: &Qualifier) -> bool {
    let key = BindingKey::new(TypeIdent::of::<T>(), qualifier);
    self
      .bindings
      .get(&key)
      .map_or(false, |state| state.provider().is_some())
  }

  // --- RESOLUTION ---

  /// Resolves `T` under the empty qualifier.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self) -> Result<Arc<T>, InjectError> {
    self.get_qualified::<T>(&Qualifier::default())
  }

  /// Resolves `T` under a qualifier. Fails with `UnboundType` if no binding
  /// exists for the pair or its binding has no provider; otherwise delegates
  /// to the binding's scope strategy.
  pub fn get_qualified<T: ?Sized + Any + Send + Sync>(&self, qualifier: &Qualifier) -> Result<Arc<T>, InjectError> {
    let key = BindingKey::new(TypeIdent::of::<T>(), qualifier);
    let instance = self.resolve_key(&key)?;
    unerase::<T>(&instance)
  }

  /// Erased resolution through a possibly-wrapped handle.
  pub fn get_dyn(&self, handle: &TypeHandle) -> Result<Instance, InjectError> {
    let ident = handle.canonical()?;
    let qualifier = handle.qualifier().cloned().unwrap_or_default();
    self.resolve_key(&BindingKey::new(ident, &qualifier))
  }

  /// Resolves every binding registered under `T`, regardless of qualifier,
  /// in registration order. Empty if none exist.
  pub fn get_all<T: ?Sized + Any + Send + Sync>(&self) -> Result<Vec<(Qualifier, Arc<T>)>, InjectError> {
    let ident = TypeIdent::of::<T>();
    let keys = self
      .registration_order
      .get(&ident)
      .map(|entry| entry.value().clone())
      .unwrap_or_default();
    let mut out = Vec::with_capacity(keys.len());
    for key in &keys {
      let qualifier = self
        .bindings
        .get(key)
        .map(|state| state.qualifier().clone())
        .unwrap_or_default();
      let instance = self.resolve_key(key)?;
      out.push((qualifier, unerase::<T>(&instance)?));
    }
    Ok(out)
  }

  pub(crate) fn resolve_key(&self, key: &BindingKey) -> Result<Instance, InjectError> {
    // Panics on a circular chain; cleans itself up on unwind.
    let _cycle = ResolutionGuard::new(key.clone());
    let unbound = || InjectError::UnboundType {
      type_name: key.ident().name(),
      qualifier: key.qualifier_key().to_owned(),
    };
    let state = self
      .bindings
      .get(key)
      .map(|entry| entry.value().clone())
      .ok_or_else(unbound)?;
    let provider = state.provider().ok_or_else(unbound)?;
    let scope = state.scope_or_default();
    trace!(type_name = key.ident().name(), qualifier = key.qualifier_key(), "resolving");
    scope.resolve(&ScopeContext::new(key, &provider, self))
  }

  // --- FACTORY ---

  /// Registers `T`'s constructor: the "this type is known" event pushed by
  /// the discovery layer at definition time. Idempotent; an existing record
  /// (and its discovered parameters) is left untouched.
  pub fn register<T: Construct>(&self) {
    self
      .factories
      .entry(TypeIdent::of::<T>())
      .or_insert_with(|| Arc::new(FactoryRecord::of::<T>()));
  }

  /// Records one constructor-parameter dependency fact for `O`.
  ///
  /// Facts arrive from the last declared parameter to the first, so each is
  /// prepended; once discovery finishes the list reads in true left-to-right
  /// constructor order. The prepend compensation is a correctness invariant,
  /// not an accident of processing order.
  pub fn declare_param<O: Construct>(&self, spec: ParamSpec) {
    self.register::<O>();
    if let Some(record) = self.factories.get(&TypeIdent::of::<O>()) {
      record.prepend_param(spec);
    }
  }

  /// Builds a fresh `T` directly, outside any binding: the registry-bypassing
  /// construction path. Refused with `BlockedDirectInstantiation` while `T`
  /// is singleton-managed.
  pub fn construct<T: Construct>(&self) -> Result<T, InjectError> {
    let ident = TypeIdent::of::<T>();
    self.guard.check(ident)?;
    self.register::<T>();
    let specs = self
      .factories
      .get(&ident)
      .map(|record| record.params())
      .unwrap_or_default();
    let mut args = self.resolve_args(&specs)?;
    T::construct(&mut args)
  }

  /// Builds the binding's target through its factory record, honoring a
  /// `with_params` override on the binding.
  pub(crate) fn build_for_binding(&self, target: TypeIdent, key: &BindingKey) -> Result<Instance, InjectError> {
    self.guard.check(target)?;
    let record = self
      .factories
      .get(&target)
      .map(|entry| entry.value().clone())
      .ok_or_else(|| InjectError::UnboundType {
        type_name: target.name(),
        qualifier: key.qualifier_key().to_owned(),
      })?;
    let specs = self
      .bindings
      .get(key)
      .and_then(|state| state.params_override())
      .unwrap_or_else(|| record.params());
    let mut args = self.resolve_args(&specs)?;
    record.build(&mut args)
  }

  fn resolve_args(&self, specs: &[ParamSpec]) -> Result<ConstructorArgs, InjectError> {
    let mut resolved = Vec::with_capacity(specs.len());
    for spec in specs {
      resolved.push(self.resolve_key(&BindingKey::new(spec.ident, &spec.qualifier))?);
    }
    Ok(ConstructorArgs::new(resolved))
  }

  // --- FIELD INJECTION ---

  /// Records a field plan: field `field` on `Owner` wants a `Dep` under the
  /// qualifier. Consumed lazily by [`crate::InjectedField`] slots on first
  /// read.
  pub fn install<Owner: ?Sized + Any, Dep: ?Sized + Any>(&self, field: &'static str, qualifier: Qualifier) {
    self.field_plans.insert(
      (TypeIdent::of::<Owner>(), field),
      FieldPlan::new(TypeIdent::of::<Dep>(), qualifier),
    );
  }

  pub(crate) fn field_plan(&self, owner: TypeIdent, field: &'static str) -> Option<FieldPlan> {
    self.field_plans.get(&(owner, field)).map(|entry| entry.value().clone())
  }

  // --- SNAPSHOT / RESTORE ---

  /// Captures the current provider and scope of `T`'s binding under the
  /// empty qualifier.
  pub fn snapshot<T: ?Sized + Any + Send + Sync>(&self) {
    self.snapshot_qualified::<T>(&Qualifier::default())
  }

  /// Captures the current provider and scope of the (type, qualifier)
  /// binding. The ledger keeps one slot per identity; a second snapshot
  /// overwrites the first.
  pub fn snapshot_qualified<T: ?Sized + Any + Send + Sync>(&self, qualifier: &Qualifier) {
    let ident = TypeIdent::of::<T>();
    let state = self.bind_state(ident, qualifier);
    self.snapshots.insert(
      ident,
      SnapshotRecord {
        provider: state.provider(),
        scope: state.scope(),
      },
    );
    debug!(type_name = ident.name(), qualifier = %qualifier, "snapshot recorded");
  }

  /// Re-applies the snapshotted provider (and scope, if one was saved) to
  /// `T`'s binding under the empty qualifier.
  pub fn restore<T: ?Sized + Any + Send + Sync>(&self) -> Result<(), InjectError> {
    self.restore_qualified::<T>(&Qualifier::default())
  }

  /// Re-applies the snapshotted provider and scope to the (type, qualifier)
  /// binding, resetting whatever the displaced scope had cached. Fails with
  /// `NoSnapshotRecorded` if the identity was never snapshotted.
  pub fn restore_qualified<T: ?Sized + Any + Send + Sync>(&self, qualifier: &Qualifier) -> Result<(), InjectError> {
    let ident = TypeIdent::of::<T>();
    let record = self
      .snapshots
      .get(&ident)
      .map(|entry| SnapshotRecord {
        provider: entry.provider.clone(),
        scope: entry.scope.clone(),
      })
      .ok_or(InjectError::NoSnapshotRecorded {
        type_name: ident.name(),
      })?;
    let state = self.bind_state(ident, qualifier);
    state.replace_provider(record.provider);
    if let Some(scope) = record.scope {
      state.replace_scope(self, scope);
    }
    debug!(type_name = ident.name(), qualifier = %qualifier, "snapshot restored");
    Ok(())
  }
}
