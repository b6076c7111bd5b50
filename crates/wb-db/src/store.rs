//! Generic transactional store for [`Tracked`] records.
//!
//! Each write runs in one transaction and raises its lifecycle event to every
//! registered listener: `Created` after the insert (the identifier exists),
//! `Updating` and `Deleting` before the statement runs (the prior state is
//! still readable). Listener output is appended on the same transaction.
//! Any failure, including a constraint violation after the audit rows were
//! appended, rolls the whole transaction back.

use libsql::{Connection, Transaction};
use wb_audit::{AuditError, EntityChange, resolve_entity_id};
use wb_core::enums::LifecycleEvent;
use wb_core::errors::CoreError;
use wb_core::schema::{FieldValue, RecordSchema, Snapshot, Tracked};

use crate::error::DatabaseError;
use crate::helpers::{column_list, quote_ident, row_to_snapshot, to_sql_value};
use crate::repos::audit::append_audit_on;
use crate::service::WbService;

impl WbService {
    /// Insert `record`, assign its identifier, and return it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails or a listener rejects the
    /// change. Nothing is persisted in either case.
    pub async fn insert<T: Tracked>(&self, mut record: T) -> Result<T, DatabaseError> {
        let schema = T::schema();
        ensure_fields(schema)?;
        let snapshot = record.snapshot();

        let _guard = self.write_gate().await;
        let tx = self.db().conn().transaction().await?;
        let result = self.insert_in(&tx, schema, &snapshot).await;
        let id = finish(tx, result).await?;

        record.assign_id(id);
        Ok(record)
    }

    /// Persist `record`'s current state over its stored row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the record has no valid identifier, no row
    /// exists for it, the UPDATE fails, or a listener rejects the change.
    pub async fn update<T: Tracked>(&self, record: &T) -> Result<(), DatabaseError> {
        let schema = T::schema();
        ensure_fields(schema)?;
        let id_value = record.identifier();
        let id = resolve_entity_id(schema, id_value.as_ref())?;
        let new_state = record.snapshot();

        let _guard = self.write_gate().await;
        let tx = self.db().conn().transaction().await?;
        let result = self
            .update_in(&tx, schema, id, id_value.as_ref(), &new_state)
            .await;
        finish(tx, result).await
    }

    /// Delete the `T` row with identifier `id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if no row exists, the DELETE fails, or a
    /// listener rejects the change.
    pub async fn delete<T: Tracked>(&self, id: i64) -> Result<(), DatabaseError> {
        let schema = T::schema();
        ensure_fields(schema)?;

        let _guard = self.write_gate().await;
        let tx = self.db().conn().transaction().await?;
        let result = self.delete_in(&tx, schema, id).await;
        finish(tx, result).await
    }

    /// Load the `T` row with identifier `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or the row cannot be decoded.
    pub async fn find<T: Tracked>(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let schema = T::schema();
        let _guard = self.read_gate().await;
        match load_snapshot(self.db().conn(), schema, id).await? {
            Some(snapshot) => Ok(Some(T::from_snapshot(id, &snapshot)?)),
            None => Ok(None),
        }
    }

    /// Up to `limit` `T` rows in identifier order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row cannot be decoded.
    pub async fn list<T: Tracked>(&self, limit: u32) -> Result<Vec<T>, DatabaseError> {
        let schema = T::schema();
        let id_column = quote_ident(schema.id_column);
        let sql = format!(
            "SELECT {id_column}, {} FROM {} ORDER BY {id_column} LIMIT {limit}",
            column_list(schema),
            quote_ident(schema.storage_name()),
        );

        let _guard = self.read_gate().await;
        let mut rows = self.db().conn().query(&sql, ()).await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            let id = row.get::<i64>(0)?;
            let snapshot = row_to_snapshot(&row, schema, 1)?;
            records.push(T::from_snapshot(id, &snapshot)?);
        }
        Ok(records)
    }

    async fn insert_in(
        &self,
        conn: &Connection,
        schema: &'static RecordSchema,
        snapshot: &Snapshot,
    ) -> Result<i64, DatabaseError> {
        let placeholders = (1..=schema.fields.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            quote_ident(schema.storage_name()),
            column_list(schema),
        );
        conn.execute(&sql, libsql::params_from_iter(sql_values(snapshot)))
            .await?;

        let id = conn.last_insert_rowid();
        let id_value = FieldValue::Integer(id);
        self.raise(
            conn,
            LifecycleEvent::Created,
            &EntityChange::created(schema, Some(&id_value), snapshot),
        )
        .await?;
        Ok(id)
    }

    async fn update_in(
        &self,
        conn: &Connection,
        schema: &'static RecordSchema,
        id: i64,
        id_value: Option<&FieldValue>,
        new_state: &Snapshot,
    ) -> Result<(), DatabaseError> {
        let old_state = load_snapshot(conn, schema, id)
            .await?
            .ok_or_else(|| not_found(schema, id))?;
        self.raise(
            conn,
            LifecycleEvent::Updating,
            &EntityChange::updating(schema, id_value, &old_state, new_state),
        )
        .await?;

        let assignments = schema
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| format!("{} = ?{}", quote_ident(field.storage_name()), i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE {} = ?{}",
            quote_ident(schema.storage_name()),
            quote_ident(schema.id_column),
            schema.fields.len() + 1,
        );
        let mut params = sql_values(new_state);
        params.push(libsql::Value::Integer(id));
        conn.execute(&sql, libsql::params_from_iter(params)).await?;
        Ok(())
    }

    async fn delete_in(
        &self,
        conn: &Connection,
        schema: &'static RecordSchema,
        id: i64,
    ) -> Result<(), DatabaseError> {
        let old_state = load_snapshot(conn, schema, id)
            .await?
            .ok_or_else(|| not_found(schema, id))?;
        let id_value = FieldValue::Integer(id);
        self.raise(
            conn,
            LifecycleEvent::Deleting,
            &EntityChange::deleting(schema, Some(&id_value), &old_state),
        )
        .await?;

        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            quote_ident(schema.storage_name()),
            quote_ident(schema.id_column),
        );
        conn.execute(&sql, [id]).await?;
        Ok(())
    }

    /// Notify every listener, then append what they produced.
    async fn raise(
        &self,
        conn: &Connection,
        event: LifecycleEvent,
        change: &EntityChange<'_>,
    ) -> Result<usize, DatabaseError> {
        let mut pending = Vec::new();
        for listener in self.listeners() {
            pending.extend(listener.on_event(event, change)?);
        }

        for record in &pending {
            append_audit_on(conn, record).await?;
        }

        if !pending.is_empty() {
            tracing::debug!(
                entity = change.schema.name,
                %event,
                records = pending.len(),
                "appended audit records"
            );
        }
        Ok(pending.len())
    }
}

/// Commit on success, roll back on failure.
async fn finish<T>(
    tx: Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = tx.rollback().await {
                tracing::warn!(%error, %rollback_error, "transaction rollback failed");
            }
            Err(error)
        }
    }
}

async fn load_snapshot(
    conn: &Connection,
    schema: &RecordSchema,
    id: i64,
) -> Result<Option<Snapshot>, DatabaseError> {
    let sql = format!(
        "SELECT {} FROM {} WHERE {} = ?1",
        column_list(schema),
        quote_ident(schema.storage_name()),
        quote_ident(schema.id_column),
    );
    let mut rows = conn.query(&sql, [id]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_snapshot(&row, schema, 0)?)),
        None => Ok(None),
    }
}

fn sql_values(snapshot: &Snapshot) -> Vec<libsql::Value> {
    snapshot.iter().map(to_sql_value).collect()
}

fn ensure_fields(schema: &RecordSchema) -> Result<(), DatabaseError> {
    if schema.fields.is_empty() {
        return Err(AuditError::NoFields {
            entity: schema.name,
        }
        .into());
    }
    Ok(())
}

fn not_found(schema: &RecordSchema, id: i64) -> DatabaseError {
    CoreError::NotFound {
        entity_type: schema.name.to_string(),
        id: id.to_string(),
    }
    .into()
}
