//! Administrative operations.
//!
//! Not part of normal operation: these bypass the lifecycle events and so
//! write no audit records.

use crate::error::DatabaseError;
use crate::service::WbService;

impl WbService {
    /// Delete every tracked record and every audit record.
    ///
    /// Returns the number of rows removed from each table as
    /// `(records, audit_records)`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a DELETE fails; nothing is removed then.
    pub async fn reset_all(&self) -> Result<(u64, u64), DatabaseError> {
        let _guard = self.write_gate().await;
        let tx = self.db().conn().transaction().await?;
        let records = tx.execute("DELETE FROM delivery_order", ()).await?;
        let audit_records = tx.execute("DELETE FROM entity_audit", ()).await?;
        tx.commit().await?;

        tracing::warn!(records, audit_records, "reset all waybill data");
        Ok((records, audit_records))
    }
}
