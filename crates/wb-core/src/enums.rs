//! State enums and lifecycle event kinds for waybill.
//!
//! `DeliveryOrderState` serializes as its upper-case name, which is also the
//! value stored in SQL and recorded in the audit log.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// DeliveryOrderState
// ---------------------------------------------------------------------------

/// Progress of a delivery order.
///
/// ```text
/// QUEUED → IN_PROGRESS → DELIVERED
///        → CANCELLED
/// ```
///
/// Transitions are not enforced by the store; any state may be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryOrderState {
    Queued,
    InProgress,
    Delivered,
    Cancelled,
}

impl DeliveryOrderState {
    pub const ALL: [Self; 4] = [
        Self::Queued,
        Self::InProgress,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::InProgress => "IN_PROGRESS",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for DeliveryOrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryOrderState {
    type Err = CoreError;

    /// Accepts the stored name in any case, with `-` or `_` as separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| CoreError::Validation(format!("unknown delivery order state '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// Write notifications raised by the transactional store for a tracked record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Fired after the row is inserted and its identifier assigned.
    Created,
    /// Fired before the row is updated; carries old and new state.
    Updating,
    /// Fired before the row is deleted; carries the state being removed.
    Deleting,
}

impl LifecycleEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updating => "updating",
            Self::Deleting => "deleting",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
