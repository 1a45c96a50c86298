//! Lazy, per-instance cached field injection.
//!
//! A field becomes managed by embedding an [`InjectedField`] slot: the first
//! read resolves the dependency through the registry and caches it on the
//! instance, every later read returns the cache, and an explicit `set`
//! overwrites the cache without any re-resolution. Which qualifier the first
//! read resolves under comes from the field plan the discovery layer
//! installed via [`crate::Injector::install`]; with no plan, the empty
//! qualifier is used.

use crate::error::InjectError;
use crate::identity::TypeIdent;
use crate::injector::Injector;
use crate::qualifier::Qualifier;
use parking_lot::RwLock;
use std::any::Any;
use std::sync::Arc;

/// An installed field plan: the dependency identity and qualifier recorded
/// for one (owner, field) pair.
#[derive(Clone, Debug)]
pub(crate) struct FieldPlan {
  dep: TypeIdent,
  qualifier: Qualifier,
}

impl FieldPlan {
  pub(crate) fn new(dep: TypeIdent, qualifier: Qualifier) -> Self {
    Self { dep, qualifier }
  }
}

/// A per-instance cache slot for one injected field of type `T`.
pub struct InjectedField<T: ?Sized + Send + Sync + 'static> {
  owner: TypeIdent,
  field: &'static str,
  slot: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized + Send + Sync + 'static> InjectedField<T> {
  /// An empty slot for field `field` of owner type `O`.
  pub fn new<O: ?Sized + Any>(field: &'static str) -> Self {
    Self {
      owner: TypeIdent::of::<O>(),
      field,
      slot: RwLock::new(None),
    }
  }

  /// Reads the field. The first read resolves the dependency through the
  /// registry under the installed plan's qualifier and caches it; later
  /// reads return the cached value unchanged.
  pub fn get(&self, injector: &Injector) -> Result<Arc<T>, InjectError> {
    if let Some(cached) = self.slot.read().as_ref() {
      return Ok(cached.clone());
    }
    let qualifier = match injector.field_plan(self.owner, self.field) {
      Some(plan) => {
        // A plan recorded for a different dependency type than the slot is
        // a wiring bug on the discovery side; refuse rather than resolve
        // the wrong thing.
        if plan.dep != TypeIdent::of::<T>() {
          return Err(InjectError::InvalidType {
            expected: std::any::type_name::<T>(),
            found: format!(
              "field plan for `{}.{}` names `{}`",
              self.owner.short_name(),
              self.field,
              plan.dep.name()
            ),
          });
        }
        plan.qualifier
      }
      None => Qualifier::default(),
    };
    let resolved = injector.get_qualified::<T>(&qualifier)?;
    let mut slot = self.slot.write();
    // A concurrent first read may have won; keep whichever landed.
    Ok(slot.get_or_insert(resolved).clone())
  }

  /// Overwrites the cache directly. Later reads return this value and never
  /// re-resolve.
  pub fn set(&self, value: Arc<T>) {
    *self.slot.write() = Some(value);
  }

  /// True if a value is cached (resolved or explicitly set).
  pub fn is_cached(&self) -> bool {
    self.slot.read().is_some()
  }
}

impl<T: ?Sized + Send + Sync + 'static> std::fmt::Debug for InjectedField<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "InjectedField({}.{}, cached: {})",
      self.owner.short_name(),
      self.field,
      self.is_cached()
    )
  }
}
