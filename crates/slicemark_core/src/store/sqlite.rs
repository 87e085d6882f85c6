//! SQLite-backed document store.
//!
//! # Responsibility
//! - Persist whole JSON documents in the `documents` table.
//! - Track a per-key write revision for diagnostics.
//!
//! # Invariants
//! - The connection must be fully migrated before the store is created.
//! - Every `set_raw` replaces the whole body and bumps `revision` by one.

use super::{DocumentStore, StoreResult};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};

/// Document store over a borrowed, migrated connection.
pub struct SqliteDocumentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentStore<'conn> {
    /// Creates a store from a connection returned by `open_db*`.
    ///
    /// # Errors
    /// - [`DbError::UninitializedConnection`] when migrations have not run.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(DbError::UninitializedConnection {
                expected_version,
                actual_version,
            }
            .into());
        }
        Ok(Self { conn })
    }

    /// Number of writes applied to `key`; `None` when absent.
    pub fn revision(&self, key: &str) -> StoreResult<Option<i64>> {
        let revision = self
            .conn
            .query_row(
                "SELECT revision FROM documents WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(revision)
    }
}

impl DocumentStore for SqliteDocumentStore<'_> {
    fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        let body = self
            .conn
            .query_row("SELECT body FROM documents WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(body)
    }

    fn set_raw(&self, key: &str, body: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO documents (key, body, revision)
             VALUES (?1, ?2, 1)
             ON CONFLICT(key) DO UPDATE SET
                 body = excluded.body,
                 revision = documents.revision + 1,
                 updated_at = (CAST(strftime('%s', 'now') AS INTEGER) * 1000);",
            params![key, body],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM documents WHERE key = ?1;", [key])?;
        Ok(())
    }
}
