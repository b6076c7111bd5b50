//! # wb-db
//!
//! libSQL storage for waybill: tracked record tables, the transactional store
//! that raises lifecycle events around every write, and the append-only
//! field-level audit log those events feed.
//!
//! Every mutation runs in one transaction. Listener output is appended on the
//! same transaction, so an audit row exists if and only if its write commits.

pub mod admin;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod store;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all waybill state.
///
/// Wraps a libSQL database and its connection.
pub struct WbDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl WbDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let wb_db = Self { db, conn };
        wb_db.run_migrations().await?;
        Ok(wb_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
