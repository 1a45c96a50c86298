//! The construction guard: registry-owned blocking of direct, registry-
//! bypassing instantiation of singleton-managed types.
//!
//! The guard is an explicit map from logical identity to a blocked flag plus
//! a lift count, owned by the registry and toggled only by scope strategies
//! during their own `resolve` call. It is inspectable in isolation; nothing
//! is ever stored on the managed type itself.

use crate::error::InjectError;
use crate::identity::TypeIdent;
use dashmap::{DashMap, DashSet};

#[derive(Default)]
pub struct ConstructionGuard {
  blocked: DashSet<TypeIdent>,
  // Re-entrant lift counts, so nested resolutions of guarded types behave.
  lifted: DashMap<TypeIdent, usize>,
}

impl ConstructionGuard {
  /// Marks the identity as blocked for direct construction.
  pub(crate) fn block(&self, ident: TypeIdent) {
    self.blocked.insert(ident);
  }

  /// Clears the block, if any.
  pub(crate) fn unblock(&self, ident: TypeIdent) {
    self.blocked.remove(&ident);
  }

  /// True if direct construction of the identity is currently refused.
  pub fn is_blocked(&self, ident: TypeIdent) -> bool {
    self.blocked.contains(&ident) && self.lifted.get(&ident).map_or(true, |count| *count == 0)
  }

  /// Fails with `BlockedDirectInstantiation` if the identity is blocked.
  pub fn check(&self, ident: TypeIdent) -> Result<(), InjectError> {
    if self.is_blocked(ident) {
      return Err(InjectError::BlockedDirectInstantiation {
        type_name: ident.name(),
      });
    }
    Ok(())
  }

  /// Temporarily lifts the block while the returned guard lives. Used by
  /// scope strategies around their own provider invocation.
  pub(crate) fn lift(&self, ident: TypeIdent) -> LiftGuard<'_> {
    *self.lifted.entry(ident).or_insert(0) += 1;
    LiftGuard { guard: self, ident }
  }
}

/// RAII handle re-applying the construction guard on drop.
pub(crate) struct LiftGuard<'a> {
  guard: &'a ConstructionGuard,
  ident: TypeIdent,
}

impl Drop for LiftGuard<'_> {
  fn drop(&mut self) {
    if let Some(mut count) = self.guard.lifted.get_mut(&self.ident) {
      *count = count.saturating_sub(1);
    }
  }
}
