//! OccupancyLedger - 预订 / 到店状态机
//!
//! # 状态
//!
//! ```text
//! pending ──► served ──► finished
//!    │
//!    └──────► cancelled
//! ```
//!
//! Every mutation runs in one transaction whose first statement takes the
//! table's write lock ([`tables::lock_table`]). Preconditions are re-read
//! after the lock, and the registry flag is re-derived with
//! [`resolver::resolve_current`] before commit.

pub mod resolver;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono_tz::Tz;
use shared::error::ErrorCode;
use shared::models::{
    CustomerUpsert, OccupancyKind, OccupancyRecord, OccupancyStatus, ReservationCreate,
    StatusTransition, TableStatus, VacantLabel, VisitSummary, WalkinCreate,
};
use sqlx::{SqliteConnection, SqlitePool};

use crate::clients;
use crate::core::{EngineError, EngineResult};
use crate::db::repository::occupancy::OccupancyInsert;
use crate::db::repository::{customer, dining_table, occupancy};
use crate::tables;
use crate::utils::Clock;
use crate::utils::time::business_day_bounds;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, normalize_optional, validate_optional_text, validate_party_size,
};

/// Ledger behavior switches
#[derive(Debug, Clone, Copy)]
pub struct LedgerSettings {
    /// Accept reservations whose window overlaps another open record
    pub allow_double_booking: bool,
    /// Business timezone, for "today"
    pub timezone: Tz,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            allow_double_booking: false,
            timezone: Tz::UTC,
        }
    }
}

/// Who the record is for, as given by the caller
struct Guest {
    national_id: Option<String>,
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
}

#[derive(Clone)]
pub struct OccupancyLedger {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    settings: LedgerSettings,
}

impl OccupancyLedger {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>, settings: LedgerSettings) -> Self {
        Self {
            pool,
            clock,
            settings,
        }
    }

    /// Book a table for a time window
    pub async fn create_reservation(&self, req: ReservationCreate) -> EngineResult<OccupancyRecord> {
        let now = self.clock.now_millis();
        if req.end <= req.start {
            return Err(EngineError::invalid_window("window end must be after its start"));
        }
        if req.end <= now {
            return Err(EngineError::invalid_window("window has already ended"));
        }
        let guest = Guest {
            national_id: normalize_optional(req.national_id),
            name: normalize_optional(req.name),
            phone: req.phone,
            email: req.email,
        };
        if guest.national_id.is_none() && guest.name.is_none() {
            return Err(EngineError::InvalidInput {
                code: ErrorCode::RequiredField,
                message: "national_id or name is required".into(),
            });
        }
        let notes = normalize_optional(req.notes);
        validate_record_fields(&guest, req.party_size, &notes)?;

        let mut tx = self.pool.begin().await?;
        tables::lock_table(&mut tx, req.table_id, now).await?;
        let branch_id = table_branch(&mut tx, req.table_id, req.branch_id).await?;

        if !self.settings.allow_double_booking
            && let Some(other) =
                occupancy::find_overlapping(&mut *tx, req.table_id, req.start, req.end, now).await?
        {
            return Err(EngineError::reservation_conflict(req.table_id, other));
        }

        let kind = OccupancyKind::Scheduled {
            start: req.start,
            end: Some(req.end),
        };
        let record = insert_record(&mut tx, req.table_id, branch_id, kind, guest, req.party_size, notes, now)
            .await?;
        let available = tables::sync_availability(&mut tx, req.table_id, now).await?;
        tx.commit().await?;

        tracing::info!(
            table_id = record.table_id,
            record_id = record.id,
            start = req.start,
            end = req.end,
            available,
            "Reservation created"
        );
        Ok(record)
    }

    /// Seat a party that arrived without a booking
    ///
    /// Rejected while the table holds another walk-in or a served party. A
    /// pending reservation whose window has started does not block it.
    pub async fn create_walkin(&self, req: WalkinCreate) -> EngineResult<OccupancyRecord> {
        let now = self.clock.now_millis();
        let guest = Guest {
            national_id: normalize_optional(req.national_id),
            name: normalize_optional(req.name),
            phone: req.phone,
            email: req.email,
        };
        let notes = normalize_optional(req.notes);
        validate_record_fields(&guest, req.party_size, &notes)?;

        let mut tx = self.pool.begin().await?;
        tables::lock_table(&mut tx, req.table_id, now).await?;
        let branch_id = table_branch(&mut tx, req.table_id, req.branch_id).await?;

        let records = occupancy::find_open_by_table(&mut *tx, req.table_id).await?;
        if let Some(current) = resolver::resolve_current(&records, now)
            && (current.kind.is_walkin() || current.status == OccupancyStatus::Served)
        {
            return Err(EngineError::table_occupied(req.table_id, current.id));
        }

        let kind = OccupancyKind::Walkin {
            arrived_at: now,
            left_at: None,
        };
        let record = insert_record(&mut tx, req.table_id, branch_id, kind, guest, req.party_size, notes, now)
            .await?;
        let available = tables::sync_availability(&mut tx, req.table_id, now).await?;
        tx.commit().await?;

        tracing::info!(
            table_id = record.table_id,
            record_id = record.id,
            available,
            "Walk-in seated"
        );
        Ok(record)
    }

    /// Move the table's current occupant to `status`
    ///
    /// Finishing or cancelling stamps the end time. Fails with a conflict, and
    /// writes nothing, when the table has no current occupant.
    pub async fn advance_status(&self, table_id: i64, status: OccupancyStatus) -> EngineResult<StatusTransition> {
        let now = self.clock.now_millis();
        let mut tx = self.pool.begin().await?;
        tables::lock_table(&mut tx, table_id, now).await?;

        let records = occupancy::find_open_by_table(&mut *tx, table_id).await?;
        let Some(current) = resolver::resolve_current(&records, now) else {
            tracing::debug!(table_id, status = %status, "Advance rejected, no current occupant");
            return Err(EngineError::no_active_occupant(table_id));
        };
        let record_id = current.id;
        let previous = current.status;

        let end = status.is_terminal().then_some(now);
        occupancy::update_status(&mut *tx, record_id, status, end).await?;
        let available = tables::sync_availability(&mut tx, table_id, now).await?;
        tx.commit().await?;

        tracing::info!(
            table_id,
            record_id,
            from = %previous,
            status = %status,
            available,
            "Occupancy status advanced"
        );
        Ok(StatusTransition {
            table_id,
            record_id,
            status,
            end: end.or(current_end(&records, record_id)),
            available,
        })
    }

    /// Live status of a table for display
    pub async fn current_status(&self, table_id: i64) -> EngineResult<TableStatus> {
        let now = self.clock.now_millis();
        // read transaction: flag and records from one snapshot
        let mut tx = self.pool.begin().await?;
        let table = dining_table::find_by_id(&mut *tx, table_id)
            .await?
            .ok_or_else(|| EngineError::table_not_found(table_id))?;
        let records = occupancy::find_open_by_table(&mut *tx, table_id).await?;
        tx.rollback().await?;

        let next_scheduled = resolver::next_scheduled(&records, now);
        let status = match resolver::resolve_current(&records, now) {
            Some(current) => TableStatus::Occupied {
                table_id,
                record_id: current.id,
                status: current.status,
                walkin: current.kind.is_walkin(),
                start: current.start(),
                end: current.end(),
                customer: current.customer_name.clone(),
                next_scheduled,
            },
            None => TableStatus::Vacant {
                table_id,
                label: if table.available {
                    VacantLabel::Free
                } else {
                    VacantLabel::Pending
                },
                next_scheduled,
            },
        };
        Ok(status)
    }

    /// Open records that started during the current business day
    pub async fn visits_today(&self) -> EngineResult<Vec<VisitSummary>> {
        let (start, end) = business_day_bounds(self.clock.now_millis(), self.settings.timezone);
        let records = occupancy::find_open_between(&self.pool, start, end).await?;
        Ok(records
            .into_iter()
            .map(|r| VisitSummary {
                record_id: r.id,
                table_id: r.table_id,
                status: r.status,
                walkin: r.kind.is_walkin(),
                start: r.start(),
                end: r.end(),
                customer: r.customer_name,
            })
            .collect())
    }
}

/// Customer an order opened at `now` on the table belongs to
///
/// The current occupant (by [`resolver::resolve_current`]) wins. Without one,
/// the latest record of the business day that has already started is used;
/// later bookings of the day never qualify. `None` when nothing qualifies or
/// the record has no customer.
pub async fn customer_for_order(
    conn: &mut SqliteConnection,
    table_id: i64,
    now: i64,
    tz: Tz,
) -> EngineResult<Option<i64>> {
    let records = occupancy::find_open_by_table(&mut *conn, table_id).await?;
    if let Some(current) = resolver::resolve_current(&records, now) {
        if current.customer_id.is_some() {
            return Ok(current.customer_id);
        }
        let Some(national_id) = current.national_id.as_deref() else {
            return Ok(None);
        };
        let customer = customer::find_by_national_id(&mut *conn, national_id).await?;
        return Ok(customer.map(|c| c.id));
    }

    let (day_start, _) = business_day_bounds(now, tz);
    Ok(occupancy::latest_customer_started(conn, table_id, day_start, now).await?)
}

fn current_end(records: &[OccupancyRecord], record_id: i64) -> Option<i64> {
    records.iter().find(|r| r.id == record_id).and_then(|r| r.end())
}

fn validate_record_fields(guest: &Guest, party_size: Option<i32>, notes: &Option<String>) -> EngineResult<()> {
    validate_optional_text(&guest.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)?;
    validate_party_size(party_size)
}

/// Branch of a locked table, checked against the caller's branch when given
async fn table_branch(conn: &mut SqliteConnection, table_id: i64, expected: Option<i64>) -> EngineResult<i64> {
    let table = dining_table::find_by_id(conn, table_id)
        .await?
        .ok_or_else(|| EngineError::table_not_found(table_id))?;
    if let Some(branch_id) = expected
        && branch_id != table.branch_id
    {
        return Err(EngineError::invalid(format!(
            "Table {table_id} belongs to branch {}, not {branch_id}",
            table.branch_id
        )));
    }
    Ok(table.branch_id)
}

#[allow(clippy::too_many_arguments)]
async fn insert_record(
    conn: &mut SqliteConnection,
    table_id: i64,
    branch_id: i64,
    kind: OccupancyKind,
    guest: Guest,
    party_size: Option<i32>,
    notes: Option<String>,
    now: i64,
) -> EngineResult<OccupancyRecord> {
    let customer_id = match &guest.national_id {
        Some(national_id) => Some(
            clients::upsert_in(
                &mut *conn,
                CustomerUpsert {
                    national_id: national_id.clone(),
                    name: guest.name.clone(),
                    phone: guest.phone,
                    email: guest.email,
                },
                now,
            )
            .await?,
        ),
        None => None,
    };

    let insert = OccupancyInsert {
        table_id,
        branch_id,
        customer_id,
        kind,
        party_size,
        notes,
        customer_name: guest.name,
        national_id: guest.national_id,
    };
    let id = occupancy::insert(&mut *conn, &insert, now).await?;
    occupancy::find_by_id(conn, id)
        .await?
        .ok_or_else(|| EngineError::StoreFailure(format!("occupancy record {id} vanished after insert")))
}
