//! SQL schema for the Stemma SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Production events are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS production_events (
    event_id      TEXT PRIMARY KEY,
    identifier    TEXT NOT NULL UNIQUE, -- serial printed on the unit
    item_code     TEXT NOT NULL,
    item_name     TEXT NOT NULL,
    item_category TEXT NOT NULL,        -- 'raw_material' | 'intermediate' | 'finished'
    mass_kg       REAL,                 -- at least one of mass_kg/length_m is set
    length_m      REAL,
    produced_on   TEXT NOT NULL,        -- ISO 8601 date
    produced_at   TEXT NOT NULL,        -- HH:MM:SS
    operator      TEXT NOT NULL,
    equipment     TEXT,
    recorded_at   TEXT NOT NULL         -- ISO 8601 UTC; server-assigned
);

-- One row per unit consumed by an event; append-only like the events.
-- consumed_identifier is a plain serial, not a foreign key: consumption may
-- be recorded ahead of the consumed unit's own event row.
CREATE TABLE IF NOT EXISTS consumptions (
    consumption_id      TEXT PRIMARY KEY,
    consuming_event_id  TEXT NOT NULL REFERENCES production_events(event_id),
    consumed_identifier TEXT NOT NULL,
    mass_kg             REAL,
    length_m            REAL,
    recorded_at         TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS consumptions_event_idx      ON consumptions(consuming_event_id);
CREATE INDEX IF NOT EXISTS consumptions_identifier_idx ON consumptions(consumed_identifier);

PRAGMA user_version = 1;
";
