//! The error taxonomy of the resolution engine.
//!
//! Every failure is synchronous and surfaced to the direct caller. Nothing is
//! retried, logged, or swallowed internally, and a failed operation leaves no
//! partial state behind: a `get` that fails with [`InjectError::UnboundType`]
//! does not poison the binding, and a retry with corrected input succeeds.

use thiserror::Error;

/// Errors produced by the registry, factory, scopes, and ledger.
#[derive(Debug, Error)]
pub enum InjectError {
  /// An erased value did not carry the identity that was required at a typed
  /// boundary: a constructor argument list ran out or yielded the wrong
  /// type, a resolved instance did not match the requested type, or a field
  /// plan disagrees with the slot reading it.
  #[error("expected a value of type `{expected}`, {found}")]
  InvalidType {
    expected: &'static str,
    found: String,
  },

  /// A synthetic wrapper chain was exhausted without reaching a declared
  /// type. Should not occur for well-formed handles.
  #[error("no declared type behind the synthetic chain `{handle}`")]
  UnresolvableIdentity { handle: String },

  /// A qualifier attribute value pushed across the dynamic boundary was not
  /// a supported scalar or a type identity.
  #[error("qualifier attribute `{attribute}` holds an unsupported value type")]
  InvalidQualifierType { attribute: String },

  /// `get` was called for a (type, qualifier) pair with no binding, or with
  /// a binding that has no provider configured.
  #[error("no provider bound for `{type_name}` under qualifier `{qualifier}`")]
  UnboundType {
    type_name: &'static str,
    qualifier: String,
  },

  /// Direct construction of a singleton-managed type was attempted outside
  /// the registry.
  #[error("`{type_name}` is singleton-managed; construct it through the registry")]
  BlockedDirectInstantiation { type_name: &'static str },

  /// `restore` was called for an identity that was never snapshotted.
  #[error("no snapshot recorded for `{type_name}`")]
  NoSnapshotRecorded { type_name: &'static str },
}
