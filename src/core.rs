//! Core data structures shared across the engine.

use crate::error::InjectError;
use crate::identity::TypeIdent;
use crate::injector::Injector;
use crate::qualifier::Qualifier;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// An erased resolved instance.
///
/// The payload is always an `Arc<T>` for the binding's source type `T`
/// (possibly unsized), wrapped once more so the erased value itself clones
/// cheaply inside scope caches. Typed access goes through
/// `downcast_ref::<Arc<T>>()`.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Wraps a typed shared instance into its erased form.
pub fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Instance {
  Arc::new(value)
}

/// Recovers the typed shared instance from an erased one.
pub fn unerase<T: ?Sized + Send + Sync + 'static>(instance: &Instance) -> Result<Arc<T>, InjectError> {
  instance
    .downcast_ref::<Arc<T>>()
    .cloned()
    .ok_or_else(|| InjectError::InvalidType {
      expected: std::any::type_name::<T>(),
      found: "an instance of a different type was bound under this key".to_owned(),
    })
}

/// The stored construction strategy of a binding: a factory invoked by the
/// binding's scope, with registry access for resolving nested dependencies.
pub type ProviderFn = Arc<dyn Fn(&Injector) -> Result<Instance, InjectError> + Send + Sync>;

/// The registry key of a binding: canonical identity plus normalized
/// qualifier.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
  ident: TypeIdent,
  qualifier_key: String,
}

impl BindingKey {
  pub(crate) fn new(ident: TypeIdent, qualifier: &Qualifier) -> Self {
    Self {
      ident,
      qualifier_key: qualifier.key(),
    }
  }

  /// The canonical identity this key is registered under.
  pub fn ident(&self) -> TypeIdent {
    self.ident
  }

  /// The normalized qualifier string.
  pub fn qualifier_key(&self) -> &str {
    &self.qualifier_key
  }
}

impl fmt::Debug for BindingKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key({}, {})", self.ident.name(), self.qualifier_key)
  }
}

thread_local! {
  // The set of binding keys currently being resolved on this thread. This is
  // how circular dependency chains are caught before they recurse away.
  static RESOLVING_STACK: RefCell<HashSet<BindingKey>> = RefCell::new(HashSet::new());
}

/// An RAII guard that detects circular resolution.
///
/// Construction pushes the key onto the thread-local resolution stack and
/// panics if the key is already there. Dropping pops the key, including
/// during unwinding, so a failed resolution leaves the stack clean.
pub(crate) struct ResolutionGuard {
  key: BindingKey,
}

impl ResolutionGuard {
  pub(crate) fn new(key: BindingKey) -> Self {
    RESOLVING_STACK.with(|stack| {
      if !stack.borrow_mut().insert(key.clone()) {
        panic!("Circular dependency detected while resolving {key:?}");
      }
    });
    Self { key }
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&self.key);
    });
  }
}
