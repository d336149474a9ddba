//! [`SqliteStore`] — the SQLite implementation of [`WeaveStore`].
//!
//! Every mutating method runs its check-then-act sequence inside a single
//! SQLite transaction on the connection's dedicated thread: the existence
//! check, the state change, and the event row commit as one unit, so a
//! losing `create_weave` race observes `WeaveExists` and concurrent
//! `add_entry` calls receive gap-free indices.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use weavery_core::{
  Error as CoreError,
  entry::{DataHash, WeaveEntry},
  event::{RecordedEvent, WeaveEvent},
  store::WeaveStore,
  weave::{ActorId, Weave, WeaveId},
};

use crate::{
  Error, Result,
  encode::{
    RawEntry, RawEvent, RawWeave, encode_dt, encode_hash, encode_uuid,
  },
  schema::SCHEMA,
};

/// Wrap a serialisation failure for transport out of a `call` closure.
fn boxed(e: serde_json::Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Weavery registry backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a registry at `path` and run schema initialisation.
  ///
  /// `initial_owner` seeds the administrator identity on first open only;
  /// once an owner is persisted, ownership changes exclusively through
  /// [`WeaveStore::transfer_ownership`].
  pub async fn open(
    path: impl AsRef<Path>,
    initial_owner: ActorId,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema(initial_owner).await?;
    Ok(store)
  }

  /// Open an in-memory registry — useful for testing.
  pub async fn open_in_memory(initial_owner: ActorId) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema(initial_owner).await?;
    Ok(store)
  }

  async fn init_schema(&self, initial_owner: ActorId) -> Result<()> {
    let owner_str = encode_uuid(initial_owner);
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(SCHEMA)?;
        conn.execute(
          "INSERT OR IGNORE INTO registry (id, owner) VALUES (0, ?1)",
          rusqlite::params![owner_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Row readers ─────────────────────────────────────────────────────────────

fn read_weave_row(
  tx: &rusqlite::Connection,
  id_str: &str,
) -> rusqlite::Result<Option<RawWeave>> {
  tx.query_row(
    "SELECT weave_id, creator, label, created_at, is_active
     FROM weaves WHERE weave_id = ?1",
    rusqlite::params![id_str],
    |row| {
      Ok(RawWeave {
        weave_id:   row.get(0)?,
        creator:    row.get(1)?,
        label:      row.get(2)?,
        created_at: row.get(3)?,
        is_active:  row.get(4)?,
      })
    },
  )
  .optional()
}

fn read_entry_row(
  tx: &rusqlite::Connection,
  id_str: &str,
  index: i64,
) -> rusqlite::Result<Option<RawEntry>> {
  tx.query_row(
    "SELECT weave_id, entry_index, data_hash, note, recorded_at, is_active
     FROM entries WHERE weave_id = ?1 AND entry_index = ?2",
    rusqlite::params![id_str, index],
    |row| {
      Ok(RawEntry {
        weave_id:    row.get(0)?,
        entry_index: row.get(1)?,
        data_hash:   row.get(2)?,
        note:        row.get(3)?,
        recorded_at: row.get(4)?,
        is_active:   row.get(5)?,
      })
    },
  )
  .optional()
}

fn ledger_len(
  tx: &rusqlite::Connection,
  id_str: &str,
) -> rusqlite::Result<i64> {
  tx.query_row(
    "SELECT COUNT(*) FROM entries WHERE weave_id = ?1",
    rusqlite::params![id_str],
    |row| row.get(0),
  )
}

fn append_event(
  tx: &rusqlite::Connection,
  event: &WeaveEvent,
  at_str: &str,
) -> std::result::Result<(), tokio_rusqlite::Error> {
  let payload = event.to_json().map_err(|e| match e {
    CoreError::Serialization(e) => boxed(e),
    other => tokio_rusqlite::Error::Other(Box::new(other)),
  })?;
  tx.execute(
    "INSERT INTO events (kind, payload, recorded_at) VALUES (?1, ?2, ?3)",
    rusqlite::params![event.discriminant(), payload.to_string(), at_str],
  )?;
  Ok(())
}

// ─── WeaveStore impl ─────────────────────────────────────────────────────────

impl WeaveStore for SqliteStore {
  type Error = Error;

  // ── Weaves ────────────────────────────────────────────────────────────────

  async fn create_weave(
    &self,
    caller: ActorId,
    weave_id: WeaveId,
    label: String,
  ) -> Result<Weave> {
    if weave_id.is_nil() {
      return Err(CoreError::NilWeaveId.into());
    }

    let weave = Weave {
      weave_id,
      creator: caller,
      label,
      created_at: Utc::now(),
      is_active: true,
    };

    let id_str      = encode_uuid(weave_id);
    let creator_str = encode_uuid(caller);
    let at_str      = encode_dt(weave.created_at);
    let label_cl    = weave.label.clone();
    let event = WeaveEvent::WeaveCreated {
      weave_id,
      creator:    caller,
      label:      weave.label.clone(),
      created_at: weave.created_at,
    };

    let outcome: std::result::Result<(), CoreError> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let taken: bool = tx
          .query_row(
            "SELECT 1 FROM weaves WHERE weave_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(Err(CoreError::WeaveExists(weave_id)));
        }

        tx.execute(
          "INSERT INTO weaves (weave_id, creator, label, created_at, is_active)
           VALUES (?1, ?2, ?3, ?4, 1)",
          rusqlite::params![id_str, creator_str, label_cl, at_str],
        )?;

        let position: i64 = tx.query_row(
          "SELECT COUNT(*) FROM creator_index WHERE creator = ?1",
          rusqlite::params![creator_str],
          |row| row.get(0),
        )?;
        tx.execute(
          "INSERT INTO creator_index (creator, position, weave_id) VALUES (?1, ?2, ?3)",
          rusqlite::params![creator_str, position, id_str],
        )?;

        append_event(&tx, &event, &at_str)?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;

    outcome.map_err(Error::Core)?;
    Ok(weave)
  }

  async fn set_weave_active(
    &self,
    caller: ActorId,
    weave_id: WeaveId,
    active: bool,
  ) -> Result<Weave> {
    let now        = Utc::now();
    let id_str     = encode_uuid(weave_id);
    let caller_str = encode_uuid(caller);
    let at_str     = encode_dt(now);
    let event = WeaveEvent::WeaveStatusUpdated {
      weave_id,
      is_active: active,
      timestamp: now,
    };

    let outcome: std::result::Result<RawWeave, CoreError> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(mut raw) = read_weave_row(&tx, &id_str)? else {
          return Ok(Err(CoreError::WeaveNotFound(weave_id)));
        };
        if raw.creator != caller_str {
          return Ok(Err(CoreError::NotCreator { caller, weave_id }));
        }

        // No no-op short-circuit: the write and the event happen even when
        // the flag already holds the requested value.
        tx.execute(
          "UPDATE weaves SET is_active = ?1 WHERE weave_id = ?2",
          rusqlite::params![active, id_str],
        )?;
        append_event(&tx, &event, &at_str)?;
        tx.commit()?;

        raw.is_active = active;
        Ok(Ok(raw))
      })
      .await?;

    outcome.map_err(Error::Core)?.into_weave()
  }

  async fn get_weave(&self, weave_id: WeaveId) -> Result<Option<Weave>> {
    let id_str = encode_uuid(weave_id);

    let raw: Option<RawWeave> = self
      .conn
      .call(move |conn| Ok(read_weave_row(conn, &id_str)?))
      .await?;

    raw.map(RawWeave::into_weave).transpose()
  }

  async fn weaves_of(&self, creator: ActorId) -> Result<Vec<WeaveId>> {
    let creator_str = encode_uuid(creator);

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT weave_id FROM creator_index
           WHERE creator = ?1 ORDER BY position",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![creator_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    ids
      .iter()
      .map(|s| crate::encode::decode_uuid(s))
      .collect()
  }

  // ── Entries — append-only writes ──────────────────────────────────────────

  async fn add_entry(
    &self,
    weave_id: WeaveId,
    data_hash: DataHash,
    note: Option<String>,
  ) -> Result<WeaveEntry> {
    let now      = Utc::now();
    let id_str   = encode_uuid(weave_id);
    let hash_str = encode_hash(data_hash);
    let at_str   = encode_dt(now);
    let note_cl  = note.clone();

    let outcome: std::result::Result<i64, CoreError> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Rejection order: absent weave, sentinel hash, inactive weave.
        let Some(raw) = read_weave_row(&tx, &id_str)? else {
          return Ok(Err(CoreError::WeaveNotFound(weave_id)));
        };
        if data_hash.is_zero() {
          return Ok(Err(CoreError::ZeroDataHash));
        }
        if !raw.is_active {
          return Ok(Err(CoreError::WeaveInactive(weave_id)));
        }

        // Index assignment is atomic with the length read: the next index
        // is the current ledger length.
        let index = ledger_len(&tx, &id_str)?;
        tx.execute(
          "INSERT INTO entries (weave_id, entry_index, data_hash, note, recorded_at, is_active)
           VALUES (?1, ?2, ?3, ?4, ?5, 1)",
          rusqlite::params![id_str, index, hash_str, note_cl, at_str],
        )?;

        let event = WeaveEvent::EntryAdded {
          weave_id,
          entry_index: index as u64,
          data_hash,
          note: note_cl,
          timestamp: now,
        };
        append_event(&tx, &event, &at_str)?;
        tx.commit()?;
        Ok(Ok(index))
      })
      .await?;

    let index = outcome.map_err(Error::Core)?;
    Ok(WeaveEntry {
      weave_id,
      entry_index: index as u64,
      data_hash,
      note,
      recorded_at: now,
      is_active: true,
    })
  }

  async fn set_entry_active(
    &self,
    caller: ActorId,
    weave_id: WeaveId,
    entry_index: u64,
    active: bool,
  ) -> Result<WeaveEntry> {
    let now        = Utc::now();
    let id_str     = encode_uuid(weave_id);
    let caller_str = encode_uuid(caller);
    let at_str     = encode_dt(now);
    let index      = entry_index as i64;
    let event = WeaveEvent::EntryStatusUpdated {
      weave_id,
      entry_index,
      is_active: active,
      timestamp: now,
    };

    let outcome: std::result::Result<RawEntry, CoreError> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let Some(raw) = read_weave_row(&tx, &id_str)? else {
          return Ok(Err(CoreError::WeaveNotFound(weave_id)));
        };
        if raw.creator != caller_str {
          return Ok(Err(CoreError::NotCreator { caller, weave_id }));
        }

        let len = ledger_len(&tx, &id_str)?;
        if index >= len {
          return Ok(Err(CoreError::EntryIndexOutOfRange {
            weave_id,
            index: entry_index,
            len:   len as u64,
          }));
        }

        tx.execute(
          "UPDATE entries SET is_active = ?1 WHERE weave_id = ?2 AND entry_index = ?3",
          rusqlite::params![active, id_str, index],
        )?;
        let Some(entry) = read_entry_row(&tx, &id_str, index)? else {
          // Unreachable given the length check; fail closed regardless.
          return Ok(Err(CoreError::EntryIndexOutOfRange {
            weave_id,
            index: entry_index,
            len:   len as u64,
          }));
        };

        append_event(&tx, &event, &at_str)?;
        tx.commit()?;
        Ok(Ok(entry))
      })
      .await?;

    outcome.map_err(Error::Core)?.into_entry()
  }

  async fn get_entries(&self, weave_id: WeaveId) -> Result<Vec<WeaveEntry>> {
    let id_str = encode_uuid(weave_id);

    let outcome: std::result::Result<Vec<RawEntry>, CoreError> = self
      .conn
      .call(move |conn| {
        if read_weave_row(conn, &id_str)?.is_none() {
          return Ok(Err(CoreError::WeaveNotFound(weave_id)));
        }

        let mut stmt = conn.prepare(
          "SELECT weave_id, entry_index, data_hash, note, recorded_at, is_active
           FROM entries WHERE weave_id = ?1 ORDER BY entry_index",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawEntry {
              weave_id:    row.get(0)?,
              entry_index: row.get(1)?,
              data_hash:   row.get(2)?,
              note:        row.get(3)?,
              recorded_at: row.get(4)?,
              is_active:   row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Ok(rows))
      })
      .await?;

    outcome
      .map_err(Error::Core)?
      .into_iter()
      .map(RawEntry::into_entry)
      .collect()
  }

  // ── Administration ────────────────────────────────────────────────────────

  async fn owner(&self) -> Result<ActorId> {
    let owner_str: String = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT owner FROM registry WHERE id = 0",
          [],
          |row| row.get(0),
        )?)
      })
      .await?;

    crate::encode::decode_uuid(&owner_str)
  }

  async fn transfer_ownership(
    &self,
    caller: ActorId,
    new_owner: ActorId,
  ) -> Result<()> {
    let caller_str = encode_uuid(caller);
    let owner_str  = encode_uuid(new_owner);
    let at_str     = encode_dt(Utc::now());

    let outcome: std::result::Result<(), CoreError> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let current: String = tx.query_row(
          "SELECT owner FROM registry WHERE id = 0",
          [],
          |row| row.get(0),
        )?;
        if current != caller_str {
          return Ok(Err(CoreError::NotOwner(caller)));
        }
        // Authority is checked before the argument, matching the
        // operation's documented failure order.
        if new_owner.is_nil() {
          return Ok(Err(CoreError::NilOwner));
        }

        tx.execute(
          "UPDATE registry SET owner = ?1 WHERE id = 0",
          rusqlite::params![owner_str],
        )?;

        let event = WeaveEvent::OwnershipTransferred {
          previous_owner: caller,
          new_owner,
        };
        append_event(&tx, &event, &at_str)?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;

    outcome.map_err(Error::Core)?;
    Ok(())
  }

  // ── Event log ─────────────────────────────────────────────────────────────

  async fn events_since(&self, after_seq: u64) -> Result<Vec<RecordedEvent>> {
    let after = after_seq as i64;

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT seq, kind, payload FROM events
           WHERE seq > ?1 ORDER BY seq",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![after], |row| {
            Ok(RawEvent {
              seq:     row.get(0)?,
              kind:    row.get(1)?,
              payload: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_recorded).collect()
  }
}
