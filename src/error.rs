//! Error types for the checked registry operations.

use thiserror::Error;

/// Errors produced by the registry's checked operations.
///
/// Failures inside a factory closure or a bound constructor are not
/// represented here: they panic and propagate to the caller of `get`
/// unchanged. Every failed mutation leaves the table exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// `get` was called for a name with no registered entry.
  #[error("service \"{0}\" does not exist")]
  NotFound(String),

  /// `set`/`set_shared` attempted to replace a locked entry. The existing
  /// entry is left untouched.
  #[error("service \"{0}\" is locked")]
  Locked(String),

  /// `remove` attempted to delete a locked entry. The entry remains.
  #[error("cannot remove locked service \"{0}\"")]
  RemoveLocked(String),

  /// A typed accessor resolved the entry, but the produced instance has a
  /// different concrete type than the one requested.
  #[error("service \"{name}\" resolved to {resolved}, not {requested}")]
  TypeMismatch {
    name: String,
    requested: &'static str,
    resolved: &'static str,
  },
}

/// A specialized `Result` type for registry operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
