//! Occupancy Models (预订 / 到店)
//!
//! A table is occupied either by a scheduled reservation booked in advance or
//! by a walk-in visit opened on arrival. Both kinds share one status vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Occupancy record status
///
/// `pending → served → finished` or `pending → cancelled`. `finished` and
/// `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupancyStatus {
    Pending,
    Served,
    Finished,
    Cancelled,
}

impl OccupancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Served => "served",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
        }
    }

    /// Pending or served: the record may still occupy its table
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Served)
    }

    /// Finished or cancelled
    pub fn is_terminal(&self) -> bool {
        !self.is_open()
    }
}

impl fmt::Display for OccupancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OccupancyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "served" => Ok(Self::Served),
            "finished" => Ok(Self::Finished),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown occupancy status: {other}")),
        }
    }
}

/// Kind-specific part of an occupancy record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OccupancyKind {
    /// Booked in advance for a time window
    Scheduled {
        start: i64,
        /// Planned end; overwritten with the close time when finished/cancelled
        end: Option<i64>,
    },
    /// Opened on arrival with no predetermined end
    Walkin {
        arrived_at: i64,
        left_at: Option<i64>,
    },
}

impl OccupancyKind {
    pub fn start(&self) -> i64 {
        match self {
            Self::Scheduled { start, .. } => *start,
            Self::Walkin { arrived_at, .. } => *arrived_at,
        }
    }

    pub fn end(&self) -> Option<i64> {
        match self {
            Self::Scheduled { end, .. } => *end,
            Self::Walkin { left_at, .. } => *left_at,
        }
    }

    pub fn is_walkin(&self) -> bool {
        matches!(self, Self::Walkin { .. })
    }

    /// Storage tag
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Scheduled { .. } => "scheduled",
            Self::Walkin { .. } => "walkin",
        }
    }
}

/// Reservation or walk-in visit bound to one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyRecord {
    pub id: i64,
    pub table_id: i64,
    pub branch_id: i64,
    pub customer_id: Option<i64>,
    pub status: OccupancyStatus,
    #[serde(flatten)]
    pub kind: OccupancyKind,
    pub party_size: Option<i32>,
    pub notes: Option<String>,
    /// Denormalized name for records without a resolved customer
    pub customer_name: Option<String>,
    pub national_id: Option<String>,
    pub created_at: i64,
}

impl OccupancyRecord {
    pub fn start(&self) -> i64 {
        self.kind.start()
    }

    pub fn end(&self) -> Option<i64> {
        self.kind.end()
    }
}

/// Create reservation payload (public booking page or staff)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub table_id: i64,
    /// When given, must match the table's branch
    pub branch_id: Option<i64>,
    pub national_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Window start (Unix millis)
    pub start: i64,
    /// Window end (Unix millis)
    pub end: i64,
    pub party_size: Option<i32>,
    pub notes: Option<String>,
}

/// Create walk-in payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkinCreate {
    pub table_id: i64,
    pub branch_id: Option<i64>,
    pub national_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub party_size: Option<i32>,
    pub notes: Option<String>,
}

/// Advance status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: OccupancyStatus,
}

/// Result of a successful status transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub table_id: i64,
    pub record_id: i64,
    pub status: OccupancyStatus,
    pub end: Option<i64>,
    /// Registry flag after the transition
    pub available: bool,
}

/// Nearest future scheduled reservation of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingReservation {
    pub record_id: i64,
    pub start: i64,
    pub customer: Option<String>,
}

/// Display label of a table with no current occupant
///
/// Follows the registry's cached flag, not the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VacantLabel {
    Free,
    Pending,
}

/// Live status of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TableStatus {
    Occupied {
        table_id: i64,
        record_id: i64,
        status: OccupancyStatus,
        walkin: bool,
        start: i64,
        end: Option<i64>,
        customer: Option<String>,
        next_scheduled: Option<UpcomingReservation>,
    },
    Vacant {
        table_id: i64,
        label: VacantLabel,
        next_scheduled: Option<UpcomingReservation>,
    },
}

/// Row of the "visits today" board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitSummary {
    pub record_id: i64,
    pub table_id: i64,
    pub status: OccupancyStatus,
    pub walkin: bool,
    pub start: i64,
    pub end: Option<i64>,
    pub customer: Option<String>,
}
