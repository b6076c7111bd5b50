//! Field-level audit log repository.
//!
//! Append-only: rows are inserted and read, never rewritten. The store
//! appends through [`append_audit_on`] while its write transaction is open.

use libsql::Connection;
use wb_core::entities::{AuditRecord, NewAuditRecord};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::WbService;

const AUDIT_COLUMNS: &str = "id, entity_name, field_name, entity_id, state, event_time";

/// Filter criteria for audit queries.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub entity_name: Option<String>,
    pub entity_id: Option<i64>,
    pub field_name: Option<String>,
    /// Only rows with an id greater than this one.
    pub after_id: Option<i64>,
    pub limit: Option<u32>,
}

/// Append `record` on `conn`, joining whatever transaction is open on it.
///
/// # Errors
///
/// Returns `DatabaseError` if the INSERT fails.
pub async fn append_audit_on(
    conn: &Connection,
    record: &NewAuditRecord,
) -> Result<AuditRecord, DatabaseError> {
    conn.execute(
        "INSERT INTO entity_audit (entity_name, field_name, entity_id, state, event_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            record.entity_name.as_str(),
            record.field_name.as_str(),
            record.entity_id,
            record.state.as_deref(),
            record.event_time.to_rfc3339()
        ],
    )
    .await?;
    Ok(record.clone().into_record(conn.last_insert_rowid()))
}

fn row_to_audit(row: &libsql::Row) -> Result<AuditRecord, DatabaseError> {
    Ok(AuditRecord {
        id: row.get::<i64>(0)?,
        entity_name: row.get::<String>(1)?,
        field_name: row.get::<String>(2)?,
        entity_id: row.get::<i64>(3)?,
        state: get_opt_string(row, 4)?,
        event_time: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl WbService {
    /// Append a standalone audit record in its own statement.
    ///
    /// Store writes append their records themselves; this is for callers
    /// recording changes made outside the store.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn append_audit(&self, record: &NewAuditRecord) -> Result<AuditRecord, DatabaseError> {
        let _guard = self.write_gate().await;
        append_audit_on(self.db().conn(), record).await
    }

    /// Full history of one record instance, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn audit_history(
        &self,
        entity_name: &str,
        entity_id: i64,
    ) -> Result<Vec<AuditRecord>, DatabaseError> {
        let _guard = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {AUDIT_COLUMNS} FROM entity_audit
                     WHERE entity_name = ?1 AND entity_id = ?2
                     ORDER BY id"
                ),
                libsql::params![entity_name, entity_id],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_audit(&row)?);
        }
        Ok(records)
    }

    /// Query audit records with optional filters, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditRecord>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref name) = filter.entity_name {
            params.push(libsql::Value::Text(name.clone()));
            conditions.push(format!("entity_name = ?{}", params.len()));
        }
        if let Some(id) = filter.entity_id {
            params.push(libsql::Value::Integer(id));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(ref field) = filter.field_name {
            params.push(libsql::Value::Text(field.clone()));
            conditions.push(format!("field_name = ?{}", params.len()));
        }
        if let Some(after) = filter.after_id {
            params.push(libsql::Value::Integer(after));
            conditions.push(format!("id > ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit_clause = filter
            .limit
            .map_or_else(String::new, |limit| format!("LIMIT {limit}"));
        let sql = format!(
            "SELECT {AUDIT_COLUMNS} FROM entity_audit {where_clause} ORDER BY id {limit_clause}"
        );

        let _guard = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_audit(&row)?);
        }
        Ok(records)
    }

    /// Total number of audit records.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn audit_count(&self) -> Result<i64, DatabaseError> {
        let _guard = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM entity_audit", ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }
}
