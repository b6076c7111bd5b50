//! # wb-core
//!
//! Core types and error types for waybill.
//!
//! This crate provides the foundational types shared across all waybill crates:
//! - Entity structs (audit records, delivery orders)
//! - Static per-type field tables describing tracked records (`schema`)
//! - State enums and lifecycle event kinds
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod schema;
