//! SQL schema for the Weavery SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Single-row registry state: the administrator identity.
CREATE TABLE IF NOT EXISTS registry (
    id    INTEGER PRIMARY KEY CHECK (id = 0),
    owner TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS weaves (
    weave_id   TEXT PRIMARY KEY,
    creator    TEXT NOT NULL,
    label      TEXT NOT NULL,
    created_at TEXT NOT NULL,
    is_active  INTEGER NOT NULL
);

-- Entries are strictly append-only.
-- The only UPDATE ever issued against this table sets is_active.
CREATE TABLE IF NOT EXISTS entries (
    weave_id    TEXT NOT NULL REFERENCES weaves(weave_id),
    entry_index INTEGER NOT NULL,
    data_hash   TEXT NOT NULL,   -- 32 bytes, lowercase hex
    note        TEXT,
    recorded_at TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    is_active   INTEGER NOT NULL,
    PRIMARY KEY (weave_id, entry_index)
);

-- Per-creator insertion-ordered list of created weave ids.
-- Written in the same transaction as the weave row; never removed.
CREATE TABLE IF NOT EXISTS creator_index (
    creator  TEXT NOT NULL,
    position INTEGER NOT NULL,
    weave_id TEXT NOT NULL REFERENCES weaves(weave_id),
    PRIMARY KEY (creator, position)
);

-- One row per successful mutation, committed with the mutation itself.
CREATE TABLE IF NOT EXISTS events (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    kind        TEXT NOT NULL,   -- discriminant of WeaveEvent variant
    payload     TEXT NOT NULL,   -- JSON payload (inner data only)
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS entries_weave_idx   ON entries(weave_id);
CREATE INDEX IF NOT EXISTS weaves_creator_idx  ON weaves(creator);

PRAGMA user_version = 1;
";
