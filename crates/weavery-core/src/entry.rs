//! Entry types — the immutable units of a weave's ledger.
//!
//! Entries are never updated or deleted; the only mutable field is the
//! `is_active` soft-delete flag, toggleable by the weave's creator.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{Error, Result, weave::WeaveId};

// ─── DataHash ────────────────────────────────────────────────────────────────

/// A 32-byte hash commitment. The registry stores commitments as opaque
/// values; it never validates preimages.
///
/// Serialised as a lowercase hex string in JSON and storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataHash([u8; 32]);

impl DataHash {
  pub const LEN: usize = 32;

  pub fn new(bytes: [u8; 32]) -> Self { Self(bytes) }

  pub fn as_bytes(&self) -> &[u8; 32] { &self.0 }

  /// True if every byte is zero — the one commitment value the ledger
  /// rejects at insertion.
  pub fn is_zero(&self) -> bool { self.0 == [0u8; 32] }

  pub fn to_hex(&self) -> String { hex::encode(self.0) }

  pub fn from_hex(s: &str) -> Result<Self> {
    let bytes =
      hex::decode(s).map_err(|e| Error::MalformedHash(e.to_string()))?;
    let bytes: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
      Error::MalformedHash(format!("expected {} bytes, got {}", Self::LEN, v.len()))
    })?;
    Ok(Self(bytes))
  }
}

impl fmt::Display for DataHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_hex())
  }
}

impl Serialize for DataHash {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.to_hex())
  }
}

impl<'de> Deserialize<'de> for DataHash {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    Self::from_hex(&s).map_err(de::Error::custom)
  }
}

// ─── WeaveEntry ──────────────────────────────────────────────────────────────

/// One historical record in a weave's ledger.
///
/// `entry_index` is assigned as the ledger length at insertion time and is
/// never reused or reassigned; the content fields (`data_hash`, `note`,
/// `recorded_at`) are immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaveEntry {
  pub weave_id:    WeaveId,
  /// Zero-based position in the weave's ledger; strictly increasing with no
  /// gaps.
  pub entry_index: u64,
  pub data_hash:   DataHash,
  pub note:        Option<String>,
  /// Store-assigned timestamp; never changes after creation.
  pub recorded_at: DateTime<Utc>,
  /// Soft-delete flag, independent of the owning weave's flag.
  pub is_active:   bool,
}
