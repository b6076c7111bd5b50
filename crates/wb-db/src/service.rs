//! Service layer owning the database and its change listeners.
//!
//! `WbService` wraps `WbDb` (raw database access) and the listeners the
//! transactional store notifies around each write. Store and repo methods
//! are implemented as `impl WbService` blocks in their own modules.

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use wb_audit::{ChangeInterceptor, ChangeListener};

use crate::WbDb;
use crate::error::DatabaseError;

/// Orchestrates writes with their lifecycle events and audit rows.
///
/// Every mutation method follows this protocol:
/// 1. Take the write gate
/// 2. Begin transaction
/// 3. Execute SQL and raise the lifecycle event (order depends on the event)
/// 4. Append listener output inside the transaction
/// 5. Commit, or roll back on any failure
///
/// Reads hold the gate shared, so they never see an open transaction's rows.
pub struct WbService {
    db: WbDb,
    listeners: Vec<Box<dyn ChangeListener>>,
    gate: RwLock<()>,
}

impl WbService {
    /// Open a local database with the field-level audit interceptor registered.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = WbDb::open_local(db_path).await?;
        Ok(Self::from_db(db).with_listener(ChangeInterceptor::new()))
    }

    /// Create from an existing `WbDb` with no listeners registered.
    #[must_use]
    pub fn from_db(db: WbDb) -> Self {
        Self {
            db,
            listeners: Vec::new(),
            gate: RwLock::new(()),
        }
    }

    /// Register a listener. Listeners run in registration order.
    #[must_use]
    pub fn with_listener(mut self, listener: impl ChangeListener + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &WbDb {
        &self.db
    }

    pub(crate) fn listeners(&self) -> &[Box<dyn ChangeListener>] {
        &self.listeners
    }

    /// Serialize writers. libSQL transactions are per-connection and the
    /// service shares one connection.
    pub(crate) async fn write_gate(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().await
    }

    /// Shared access for reads on the service connection.
    pub(crate) async fn read_gate(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().await
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
