//! Qualifiers: attribute sets that disambiguate multiple bindings of one
//! logical type, and their canonical string form.
//!
//! Two qualifiers carrying the same attributes are equal no matter the order
//! the attributes were declared in; canonicalization sorts by attribute name
//! and renders each as `name:value`.

use crate::error::InjectError;
use crate::identity::TypeIdent;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single qualifier attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum QualifierValue {
  Int(i64),
  Float(f64),
  Bool(bool),
  Str(String),
  /// A type used as a disambiguator, e.g. "the `Clock` used for `Audit`".
  Type(TypeIdent),
}

impl From<i64> for QualifierValue {
  fn from(v: i64) -> Self {
    Self::Int(v)
  }
}
impl From<i32> for QualifierValue {
  fn from(v: i32) -> Self {
    Self::Int(v as i64)
  }
}
impl From<f64> for QualifierValue {
  fn from(v: f64) -> Self {
    Self::Float(v)
  }
}
impl From<bool> for QualifierValue {
  fn from(v: bool) -> Self {
    Self::Bool(v)
  }
}
impl From<&str> for QualifierValue {
  fn from(v: &str) -> Self {
    Self::Str(v.to_owned())
  }
}
impl From<String> for QualifierValue {
  fn from(v: String) -> Self {
    Self::Str(v)
  }
}
impl From<TypeIdent> for QualifierValue {
  fn from(v: TypeIdent) -> Self {
    Self::Type(v)
  }
}

// Type-valued attributes render through a content hash of the full type name
// joined with the short display name. The rendering is stable within a run
// and memoized per identity.
static TYPE_RENDERINGS: Lazy<DashMap<TypeIdent, String>> = Lazy::new(DashMap::new);

fn render_type(ident: TypeIdent) -> String {
  if let Some(hit) = TYPE_RENDERINGS.get(&ident) {
    return hit.clone();
  }
  let mut hasher = DefaultHasher::new();
  ident.name().hash(&mut hasher);
  let rendered = format!("{:016x}#{}", hasher.finish(), ident.short_name());
  TYPE_RENDERINGS.insert(ident, rendered.clone());
  rendered
}

impl fmt::Display for QualifierValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Int(v) => write!(f, "{v}"),
      Self::Float(v) => write!(f, "{v}"),
      Self::Bool(v) => write!(f, "{v}"),
      Self::Str(v) => f.write_str(v),
      Self::Type(ident) => f.write_str(&render_type(*ident)),
    }
  }
}

/// An unordered attribute map disambiguating bindings of one logical type.
///
/// The empty qualifier is the default for every registry operation that does
/// not name one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Qualifier {
  attrs: BTreeMap<String, QualifierValue>,
}

impl Qualifier {
  /// The empty qualifier.
  pub fn new() -> Self {
    Self::default()
  }

  /// The common single-attribute shorthand: `name:<value>`.
  pub fn named(name: &str) -> Self {
    Self::new().with("name", name)
  }

  /// Adds an attribute, replacing any previous value under the same name.
  pub fn with(mut self, name: &str, value: impl Into<QualifierValue>) -> Self {
    self.attrs.insert(name.to_owned(), value.into());
    self
  }

  /// Adds an attribute from an untyped value, as pushed by the discovery
  /// layer. Accepts `i64`, `i32`, `f64`, `bool`, `&str`, `String`, and
  /// [`TypeIdent`]; anything else fails with `InvalidQualifierType`.
  pub fn insert_any(&mut self, name: &str, value: &dyn Any) -> Result<(), InjectError> {
    let value = if let Some(v) = value.downcast_ref::<i64>() {
      QualifierValue::Int(*v)
    } else if let Some(v) = value.downcast_ref::<i32>() {
      QualifierValue::Int(*v as i64)
    } else if let Some(v) = value.downcast_ref::<f64>() {
      QualifierValue::Float(*v)
    } else if let Some(v) = value.downcast_ref::<bool>() {
      QualifierValue::Bool(*v)
    } else if let Some(v) = value.downcast_ref::<&str>() {
      QualifierValue::Str((*v).to_owned())
    } else if let Some(v) = value.downcast_ref::<String>() {
      QualifierValue::Str(v.clone())
    } else if let Some(v) = value.downcast_ref::<TypeIdent>() {
      QualifierValue::Type(*v)
    } else {
      return Err(InjectError::InvalidQualifierType {
        attribute: name.to_owned(),
      });
    };
    self.attrs.insert(name.to_owned(), value);
    Ok(())
  }

  /// True if no attributes are set.
  pub fn is_empty(&self) -> bool {
    self.attrs.is_empty()
  }

  /// The canonical string form: attributes sorted by name, each rendered as
  /// `name:value`, joined and wrapped. Deterministic and order-independent.
  pub fn key(&self) -> String {
    let mut out = String::from("<");
    for (i, (name, value)) in self.attrs.iter().enumerate() {
      if i > 0 {
        out.push(',');
      }
      out.push_str(name);
      out.push(':');
      out.push_str(&value.to_string());
    }
    out.push('>');
    out
  }
}

impl From<&str> for Qualifier {
  /// `"x"` is shorthand for the named qualifier `name:x`.
  fn from(name: &str) -> Self {
    Self::named(name)
  }
}

impl From<&Qualifier> for Qualifier {
  fn from(qualifier: &Qualifier) -> Self {
    qualifier.clone()
  }
}

impl fmt::Display for Qualifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.key())
  }
}
