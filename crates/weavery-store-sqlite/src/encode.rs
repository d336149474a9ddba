//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Data hashes are stored as
//! lowercase hex. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use weavery_core::{
  entry::{DataHash, WeaveEntry},
  event::{RecordedEvent, WeaveEvent},
  weave::Weave,
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── DataHash ────────────────────────────────────────────────────────────────

pub fn encode_hash(hash: DataHash) -> String { hash.to_hex() }

pub fn decode_hash(s: &str) -> Result<DataHash> {
  Ok(DataHash::from_hex(s).map_err(Error::Core)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `weaves` row.
pub struct RawWeave {
  pub weave_id:   String,
  pub creator:    String,
  pub label:      String,
  pub created_at: String,
  pub is_active:  bool,
}

impl RawWeave {
  pub fn into_weave(self) -> Result<Weave> {
    Ok(Weave {
      weave_id:   decode_uuid(&self.weave_id)?,
      creator:    decode_uuid(&self.creator)?,
      label:      self.label,
      created_at: decode_dt(&self.created_at)?,
      is_active:  self.is_active,
    })
  }
}

/// Raw values read directly from an `entries` row.
pub struct RawEntry {
  pub weave_id:    String,
  pub entry_index: i64,
  pub data_hash:   String,
  pub note:        Option<String>,
  pub recorded_at: String,
  pub is_active:   bool,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<WeaveEntry> {
    Ok(WeaveEntry {
      weave_id:    decode_uuid(&self.weave_id)?,
      entry_index: self.entry_index as u64,
      data_hash:   decode_hash(&self.data_hash)?,
      note:        self.note,
      recorded_at: decode_dt(&self.recorded_at)?,
      is_active:   self.is_active,
    })
  }
}

/// Raw values read directly from an `events` row.
pub struct RawEvent {
  pub seq:     i64,
  pub kind:    String,
  pub payload: String,
}

impl RawEvent {
  pub fn into_recorded(self) -> Result<RecordedEvent> {
    let data: serde_json::Value = serde_json::from_str(&self.payload)?;
    let event = WeaveEvent::from_parts(&self.kind, data).map_err(Error::Core)?;
    Ok(RecordedEvent { seq: self.seq as u64, event })
  }
}
