//! Error types for `weavery-core`.
//!
//! Every failure is a rejected operation: callers observe an error and no
//! state change, never a partially-applied effect. [`Error::kind`] gives the
//! coarse classification transport layers map onto their own status codes.

use thiserror::Error;
use uuid::Uuid;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Malformed or sentinel input (nil id, all-zero hash).
  InvalidArgument,
  /// Uniqueness violation (weave id already taken).
  Conflict,
  /// Referenced weave absent.
  NotFound,
  /// Entry index at or beyond the current ledger length.
  OutOfRange,
  /// Caller lacks the required authority.
  Authorization,
  /// Operation not permitted in the current lifecycle state.
  InvalidState,
  /// Fault in the storage backend, surfaced through the store trait.
  Storage,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("weave id cannot be the nil uuid")]
  NilWeaveId,

  #[error("data hash cannot be all zeroes")]
  ZeroDataHash,

  #[error("malformed data hash: {0}")]
  MalformedHash(String),

  #[error("new owner cannot be the nil uuid")]
  NilOwner,

  #[error("weave already exists: {0}")]
  WeaveExists(Uuid),

  #[error("weave not found: {0}")]
  WeaveNotFound(Uuid),

  #[error("entry index {index} out of range for weave {weave_id} (ledger length {len})")]
  EntryIndexOutOfRange {
    weave_id: Uuid,
    index:    u64,
    len:      u64,
  },

  #[error("caller {caller} is not the creator of weave {weave_id}")]
  NotCreator { caller: Uuid, weave_id: Uuid },

  #[error("caller {0} is not the registry owner")]
  NotOwner(Uuid),

  #[error("weave {0} is inactive")]
  WeaveInactive(Uuid),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("storage error: {0}")]
  Storage(String),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::NilWeaveId | Self::ZeroDataHash | Self::MalformedHash(_) | Self::NilOwner => {
        ErrorKind::InvalidArgument
      }
      Self::WeaveExists(_) => ErrorKind::Conflict,
      Self::WeaveNotFound(_) => ErrorKind::NotFound,
      Self::EntryIndexOutOfRange { .. } => ErrorKind::OutOfRange,
      Self::NotCreator { .. } | Self::NotOwner(_) => ErrorKind::Authorization,
      Self::WeaveInactive(_) => ErrorKind::InvalidState,
      Self::Serialization(_) | Self::Storage(_) => ErrorKind::Storage,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kind_classification() {
    let id = Uuid::new_v4();
    assert_eq!(Error::NilWeaveId.kind(), ErrorKind::InvalidArgument);
    assert_eq!(Error::WeaveExists(id).kind(), ErrorKind::Conflict);
    assert_eq!(Error::WeaveNotFound(id).kind(), ErrorKind::NotFound);
    assert_eq!(
      Error::NotCreator { caller: id, weave_id: id }.kind(),
      ErrorKind::Authorization
    );
    assert_eq!(Error::NotOwner(id).kind(), ErrorKind::Authorization);
    assert_eq!(Error::WeaveInactive(id).kind(), ErrorKind::InvalidState);
    assert_eq!(
      Error::EntryIndexOutOfRange { weave_id: id, index: 3, len: 3 }.kind(),
      ErrorKind::OutOfRange
    );
  }
}
