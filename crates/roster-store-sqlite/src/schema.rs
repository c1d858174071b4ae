//! SQL schema for the roster SQLite store.
//!
//! Executed once at connection startup. Gated on `PRAGMA user_version` for
//! any future layout change.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per document. The body is the complete field map as a JSON
-- object, timestamps already resolved.
CREATE TABLE IF NOT EXISTS documents (
    collection  TEXT NOT NULL,
    doc_id      TEXT NOT NULL,
    body        TEXT NOT NULL,
    PRIMARY KEY (collection, doc_id)
);

PRAGMA user_version = 1;
";
