//! # wb-audit
//!
//! Change-audit engine for tracked records.
//!
//! The transactional store raises three lifecycle events per write (created,
//! updating, deleting) to every registered [`ChangeListener`]. The
//! [`ChangeInterceptor`] is the audit listener: it compares old and new
//! snapshots field by field, keeps only fields whose schema marks them
//! audit-eligible and whose value changed, and returns one
//! [`NewAuditRecord`](wb_core::entities::NewAuditRecord) per qualifying field.
//! The store appends those records on the same transaction as the write.
//!
//! Everything here is synchronous and free of I/O.

pub mod error;
pub mod interceptor;
pub mod listener;
pub mod policy;

pub use error::AuditError;
pub use interceptor::{ChangeInterceptor, resolve_entity_id};
pub use listener::{ChangeListener, EntityChange};
pub use policy::{AuditPolicy, FieldPolicy, FieldPolicyResolver};
