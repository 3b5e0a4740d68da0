//! Schema versioning for the store database.
//!
//! The version lives in `metadata.schema_version`. A database with no
//! version is fresh and gets every step in `STEPS`; a database written by
//! a newer build is refused rather than downgraded.

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::schema::{CREATE_KV_TABLE, CREATE_METADATA_TABLE};

/// Ordered upgrade steps. Step `n` brings the database to version `n`.
const STEPS: &[&[&str]] = &[&[CREATE_KV_TABLE]];

/// The schema version this build writes.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const CURRENT_VERSION: i32 = STEPS.len() as i32;

const VERSION_KEY: &str = "schema_version";

/// Bring the database schema up to [`CURRENT_VERSION`].
///
/// Safe to call on every open.
///
/// # Errors
///
/// Returns an error if the stored version is unreadable or newer than this
/// build, or if a step fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    let stored = schema_version(conn)?;
    if stored > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {stored} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    for (version, statements) in (1..).zip(STEPS).skip(usize::try_from(stored).unwrap_or(0)) {
        apply_step(conn, version, statements)?;
    }
    if stored < CURRENT_VERSION {
        info!("Store schema upgraded from version {stored} to {CURRENT_VERSION}");
    }
    Ok(())
}

/// The stored schema version, 0 for a fresh database.
fn schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

/// Run one step and record its version atomically.
fn apply_step(conn: &Connection, version: i32, statements: &[&str]) -> Result<()> {
    debug!("Applying store schema step {version}");
    let tx = conn.unchecked_transaction()?;
    for statement in statements {
        tx.execute(statement, [])?;
    }
    tx.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    tx.commit()?;
    Ok(())
}
