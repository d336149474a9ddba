//! Weave — a named, creator-owned collection of hash commitments.
//!
//! A weave holds only identity metadata and a lifecycle flag. The attested
//! content lives in its append-only entry ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a weave. Caller-chosen at creation; unique across all time and
/// never reassigned, even after deactivation.
pub type WeaveId = Uuid;

/// An authenticated caller identity, as resolved by the host environment.
pub type ActorId = Uuid;

/// A named collection with its own active/inactive lifecycle flag.
///
/// Every field except `is_active` is immutable after creation. There is no
/// rename operation; `label` is set exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weave {
  pub weave_id:   WeaveId,
  /// The identity that created the weave — the sole authority for status
  /// toggles on the weave and its entries. The administrator has no override.
  pub creator:    ActorId,
  pub label:      String,
  /// Store-assigned timestamp; never changes after creation.
  pub created_at: DateTime<Utc>,
  /// Soft-delete flag. An inactive weave accepts no new entries; its history
  /// stays readable and its entries stay independently toggleable.
  pub is_active:  bool,
}
