//! The event surface — one immutable notification per state change.
//!
//! Every successful mutating operation appends exactly one event to the
//! durable log, in the same atomic unit as the state change it describes.
//! The fields carried are sufficient for an external observer to reconstruct
//! full history without re-reading registry state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  entry::DataHash,
  weave::{ActorId, WeaveId},
};

/// A registry state change. The variant name serves as the `kind`
/// discriminant stored in the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum WeaveEvent {
  WeaveCreated {
    weave_id:   WeaveId,
    creator:    ActorId,
    label:      String,
    created_at: DateTime<Utc>,
  },
  WeaveStatusUpdated {
    weave_id:  WeaveId,
    is_active: bool,
    timestamp: DateTime<Utc>,
  },
  EntryAdded {
    weave_id:    WeaveId,
    entry_index: u64,
    data_hash:   DataHash,
    note:        Option<String>,
    timestamp:   DateTime<Utc>,
  },
  EntryStatusUpdated {
    weave_id:    WeaveId,
    entry_index: u64,
    is_active:   bool,
    timestamp:   DateTime<Utc>,
  },
  OwnershipTransferred {
    previous_owner: ActorId,
    new_owner:      ActorId,
  },
}

impl WeaveEvent {
  /// The discriminant string stored in the `kind` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn discriminant(&self) -> &'static str {
    match self {
      Self::WeaveCreated { .. } => "weave_created",
      Self::WeaveStatusUpdated { .. } => "weave_status_updated",
      Self::EntryAdded { .. } => "entry_added",
      Self::EntryStatusUpdated { .. } => "entry_status_updated",
      Self::OwnershipTransferred { .. } => "ownership_transferred",
    }
  }

  /// Serialise the inner payload (without the type tag) for the `payload`
  /// log column.
  pub fn to_json(&self) -> Result<serde_json::Value> {
    let full = serde_json::to_value(self)?;
    Ok(full.get("data").cloned().unwrap_or(serde_json::Value::Null))
  }

  /// Deserialise from the discriminant string and JSON payload stored in the
  /// event log.
  pub fn from_parts(
    discriminant: &str,
    data: serde_json::Value,
  ) -> Result<Self> {
    let wrapped = serde_json::json!({ "type": discriminant, "data": data });
    Ok(serde_json::from_value(wrapped)?)
  }
}

/// An event paired with its position in the durable log.
///
/// `seq` is assigned by the log, starts at 1, and is strictly increasing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedEvent {
  pub seq:   u64,
  pub event: WeaveEvent,
}
