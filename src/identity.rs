//! Logical type identity, and resolution of wrapped type handles back to it.
//!
//! A [`TypeIdent`] is "the type as the programmer thinks of it": the handle
//! that stays stable no matter how many construction-intercepting wrappers
//! have been layered on top during registration. A [`TypeHandle`] is what the
//! discovery layer actually holds: either a declared type, or a synthetic
//! wrapper carrying an explicit back-link to the handle it wraps plus the
//! qualifier that was active when the wrapper was created. Synthetic-ness is
//! an explicit variant, never inferred from a generated name.

use crate::error::InjectError;
use crate::qualifier::Qualifier;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The canonical identity of a logical type.
///
/// Two idents are the same identity iff they resolve to the same declaration;
/// equality and hashing go through [`TypeId`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeIdent {
  id: TypeId,
  name: &'static str,
}

impl TypeIdent {
  /// The identity of `T`. Unsized types (trait objects) are accepted.
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: type_name::<T>(),
    }
  }

  /// The full display name of the type.
  pub fn name(&self) -> &'static str {
    self.name
  }

  /// The last path segment of the display name.
  pub fn short_name(&self) -> &'static str {
    self.name.rsplit("::").next().unwrap_or(self.name)
  }
}

impl fmt::Debug for TypeIdent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeIdent({})", self.name)
  }
}

impl fmt::Display for TypeIdent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.short_name())
  }
}

// Fresh tags for opaque handles.
static OPAQUE_TAG: AtomicU64 = AtomicU64::new(0);

enum Repr {
  Declared(TypeIdent),
  Synthetic { wraps: TypeHandle, qualifier: Qualifier },
  Opaque(u64),
}

/// A possibly-wrapped type handle, resolvable to its [`TypeIdent`].
///
/// Cloning is cheap; all clones refer to the same node.
#[derive(Clone)]
pub struct TypeHandle {
  repr: Arc<Repr>,
}

impl TypeHandle {
  /// A handle for the declared type `T`.
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      repr: Arc::new(Repr::Declared(TypeIdent::of::<T>())),
    }
  }

  /// A synthetic wrapper around `wraps`, recording the qualifier that was
  /// active when the wrapper was created.
  pub fn synthetic(wraps: &TypeHandle, qualifier: Qualifier) -> Self {
    Self {
      repr: Arc::new(Repr::Synthetic {
        wraps: wraps.clone(),
        qualifier,
      }),
    }
  }

  /// A handle with no declared base. Canonicalization of such a handle (or
  /// any chain ending in one) fails with `UnresolvableIdentity`.
  pub fn opaque() -> Self {
    Self {
      repr: Arc::new(Repr::Opaque(OPAQUE_TAG.fetch_add(1, Ordering::Relaxed))),
    }
  }

  /// True if this handle is a synthetic wrapper.
  pub fn is_synthetic(&self) -> bool {
    matches!(*self.repr, Repr::Synthetic { .. })
  }

  /// Walks the back-link chain to the first declared type.
  pub fn canonical(&self) -> Result<TypeIdent, InjectError> {
    let mut cursor = self;
    loop {
      match &*cursor.repr {
        Repr::Declared(ident) => return Ok(*ident),
        Repr::Synthetic { wraps, .. } => cursor = wraps,
        Repr::Opaque(tag) => {
          return Err(InjectError::UnresolvableIdentity {
            handle: format!("{self:?} (opaque tag {tag})"),
          })
        }
      }
    }
  }

  /// The qualifier carried by the outermost synthetic wrapper, or `None` for
  /// a declared or opaque handle.
  pub fn qualifier(&self) -> Option<&Qualifier> {
    match &*self.repr {
      Repr::Synthetic { qualifier, .. } => Some(qualifier),
      _ => None,
    }
  }
}

impl fmt::Debug for TypeHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut depth = 0usize;
    let mut cursor = self;
    loop {
      match &*cursor.repr {
        Repr::Declared(ident) => {
          write!(f, "{}", ident.short_name())?;
          break;
        }
        Repr::Synthetic { wraps, .. } => {
          write!(f, "synthetic(")?;
          depth += 1;
          cursor = wraps;
        }
        Repr::Opaque(tag) => {
          write!(f, "opaque#{tag}")?;
          break;
        }
      }
    }
    for _ in 0..depth {
      write!(f, ")")?;
    }
    Ok(())
  }
}
