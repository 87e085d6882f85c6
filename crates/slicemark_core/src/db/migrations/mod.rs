//! Schema steps for the SliceMark document table.
//!
//! # Responsibility
//! - Create the `documents` table that backs every whole-document key
//!   (canvas, bookmarks, text marks, tab metadata, settings).
//! - Bring older databases forward one numbered step at a time.
//!
//! # Invariants
//! - Step numbers start at 1 and grow by one; the last one is the schema
//!   version a [`crate::store::SqliteDocumentStore`] requires.
//! - Pending steps run in a single transaction and `PRAGMA user_version`
//!   records the last step applied.
//! - A database newer than this build is refused, never downgraded.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// `(step, label, sql)` in application order.
const SCHEMA_STEPS: &[(u32, &str, &str)] = &[
    (1, "documents", include_str!("0001_documents.sql")),
    (2, "document_revisions", include_str!("0002_document_revisions.sql")),
];

/// Schema version written by the last step this build knows.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(step, _, _)| *step)
}

/// Runs every step newer than the database's `user_version`.
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the file was written by a
///   newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending: Vec<_> = SCHEMA_STEPS
        .iter()
        .filter(|(step, _, _)| *step > from)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (step, label, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", step)?;
        debug!("event=db_migrate module=db status=applied step={step} label={label}");
    }
    tx.commit()?;
    info!("event=db_migrate module=db status=ok from={from} to={latest}");
    Ok(())
}

pub(crate) fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
