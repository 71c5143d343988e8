//! Dining Table Model (桌台)

use serde::{Deserialize, Serialize};

/// Dining table entity
///
/// `available` is a cached flag derived from the occupancy ledger. It is only
/// written inside the same transaction as an occupancy transition (or by the
/// reconcile pass), never on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub branch_id: i64,
    pub capacity: i32,
    pub available: bool,
}

/// Query for the "tables available for a party and time window" predicate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableTablesQuery {
    pub branch_id: i64,
    pub capacity: i32,
    /// Window start (Unix millis)
    pub start: i64,
    /// Window end (Unix millis)
    pub end: i64,
}

/// Distinct table capacity offered by a branch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TableCapacity {
    pub capacity: i32,
}

/// A table whose cached flag was corrected by the reconcile pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailabilityCorrection {
    pub table_id: i64,
    pub was_available: bool,
    pub now_available: bool,
}
