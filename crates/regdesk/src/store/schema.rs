//! `SQLite` schema definitions for regdesk.
//!
//! This module contains the SQL statements for creating the key-value
//! tables that back the local and session scopes.

use rusqlite::Connection;

use crate::error::Result;

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
pub const VERSION_KEY: &str = "schema_version";

/// SQL statement to create the durable key-value table.
pub const CREATE_LOCAL_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the session key-value table.
pub const CREATE_SESSION_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS session_storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_LOCAL_TABLE,
    CREATE_SESSION_TABLE,
    CREATE_METADATA_TABLE,
];

/// Create all tables if they don't exist and stamp the schema version.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    conn.execute(
        "INSERT OR IGNORE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, CURRENT_VERSION.to_string()),
    )?;

    Ok(())
}
