//! Construction of concrete types from their ordered constructor
//! dependencies.
//!
//! A type becomes constructible by implementing [`Construct`] and being
//! registered with the injector. Its constructor-parameter facts arrive one
//! at a time from the discovery layer, which processes declarations from the
//! last parameter to the first; see [`crate::Injector::declare_param`] for
//! the prepend compensation that turns that stream back into left-to-right
//! constructor order.

use crate::core::{erase, unerase, Instance};
use crate::error::InjectError;
use crate::identity::TypeIdent;
use crate::qualifier::Qualifier;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;

/// One constructor dependency: what to resolve, and under which qualifier.
#[derive(Clone, Debug)]
pub struct ParamSpec {
  pub(crate) ident: TypeIdent,
  pub(crate) qualifier: Qualifier,
}

impl ParamSpec {
  /// A dependency on `T` under the empty qualifier.
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      ident: TypeIdent::of::<T>(),
      qualifier: Qualifier::default(),
    }
  }

  /// A dependency on `T` under the given qualifier.
  pub fn qualified<T: ?Sized + Any>(qualifier: Qualifier) -> Self {
    Self {
      ident: TypeIdent::of::<T>(),
      qualifier,
    }
  }

  /// The dependency's logical identity.
  pub fn ident(&self) -> TypeIdent {
    self.ident
  }
}

/// The positional argument list handed to a constructor.
///
/// Arguments were resolved in declared left-to-right order; each
/// [`next`](Self::next) call consumes the next one. Pulling past the end, or
/// pulling the wrong type, fails with `InvalidType`.
pub struct ConstructorArgs {
  resolved: std::vec::IntoIter<Instance>,
  position: usize,
}

impl ConstructorArgs {
  pub(crate) fn new(resolved: Vec<Instance>) -> Self {
    Self {
      resolved: resolved.into_iter(),
      position: 0,
    }
  }

  /// Consumes the next positional argument as a shared `T`.
  pub fn next<T: ?Sized + Send + Sync + 'static>(&mut self) -> Result<Arc<T>, InjectError> {
    let position = self.position;
    self.position += 1;
    let instance = self.resolved.next().ok_or_else(|| InjectError::InvalidType {
      expected: std::any::type_name::<T>(),
      found: format!("no constructor argument left at position {position}"),
    })?;
    unerase::<T>(&instance).map_err(|_| InjectError::InvalidType {
      expected: std::any::type_name::<T>(),
      found: format!("a different type was resolved at position {position}"),
    })
  }

  /// Arguments not yet consumed.
  pub fn remaining(&self) -> usize {
    self.resolved.len()
  }
}

/// A concrete type the engine knows how to build from resolved arguments.
pub trait Construct: Sized + Send + Sync + 'static {
  /// Builds a fresh instance, pulling each dependency positionally.
  fn construct(args: &mut ConstructorArgs) -> Result<Self, InjectError>;
}

type ErasedConstruct = Arc<dyn Fn(&mut ConstructorArgs) -> Result<Instance, InjectError> + Send + Sync>;

/// Per-type constructor record: the erased build function plus the parameter
/// list assembled from discovery facts.
pub(crate) struct FactoryRecord {
  build: ErasedConstruct,
  params: Mutex<Vec<ParamSpec>>,
}

impl FactoryRecord {
  pub(crate) fn of<T: Construct>() -> Self {
    Self {
      build: Arc::new(|args| Ok(erase(Arc::new(T::construct(args)?)))),
      params: Mutex::new(Vec::new()),
    }
  }

  /// Inserts a newly discovered dependency at the FRONT of the list.
  ///
  /// Declaration-site processing runs from the last constructor parameter to
  /// the first, so prepending each fact leaves the list in true left-to-right
  /// constructor order once discovery finishes. This compensation is a
  /// correctness invariant of the factory, not an incidental detail.
  pub(crate) fn prepend_param(&self, spec: ParamSpec) {
    self.params.lock().insert(0, spec);
  }

  /// The discovered parameter list, in constructor order.
  pub(crate) fn params(&self) -> Vec<ParamSpec> {
    self.params.lock().clone()
  }

  /// Invokes the erased constructor over an already-resolved argument list.
  pub(crate) fn build(&self, args: &mut ConstructorArgs) -> Result<Instance, InjectError> {
    (self.build)(args)
  }
}
