//! Current-occupant rule
//!
//! Pure functions over a table's records. Callers load the records (inside
//! their transaction when the answer drives a write) and pass `now` explicitly.

use shared::models::{OccupancyKind, OccupancyRecord, UpcomingReservation};

/// Whether `record` holds its table at `now`
///
/// Only pending and served records count. A walk-in holds the table from
/// creation until it ends; a scheduled reservation only once its start has
/// passed.
pub fn occupies_now(record: &OccupancyRecord, now: i64) -> bool {
    if !record.status.is_open() {
        return false;
    }
    let not_ended = record.end().is_none_or(|end| end > now);
    match record.kind {
        OccupancyKind::Walkin { .. } => not_ended,
        OccupancyKind::Scheduled { start, .. } => start <= now && not_ended,
    }
}

/// The single record currently occupying the table, if any
///
/// Walk-ins win over scheduled reservations. Within the winning kind the most
/// recently started record wins, ties going to the highest id.
pub fn resolve_current(records: &[OccupancyRecord], now: i64) -> Option<&OccupancyRecord> {
    let latest = |walkin: bool| {
        records
            .iter()
            .filter(|r| r.kind.is_walkin() == walkin && occupies_now(r, now))
            .max_by_key(|r| (r.start(), r.id))
    };
    latest(true).or_else(|| latest(false))
}

/// Nearest scheduled reservation that has not started yet
pub fn next_scheduled(records: &[OccupancyRecord], now: i64) -> Option<UpcomingReservation> {
    records
        .iter()
        .filter(|r| r.status.is_open() && !r.kind.is_walkin() && r.start() > now)
        .min_by_key(|r| (r.start(), r.id))
        .map(|r| UpcomingReservation {
            record_id: r.id,
            start: r.start(),
            customer: r.customer_name.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OccupancyStatus;

    const MIN: i64 = 60_000;

    fn scheduled(id: i64, start: i64, end: Option<i64>, status: OccupancyStatus) -> OccupancyRecord {
        record(id, OccupancyKind::Scheduled { start, end }, status)
    }

    fn walkin(id: i64, arrived_at: i64, status: OccupancyStatus) -> OccupancyRecord {
        record(
            id,
            OccupancyKind::Walkin {
                arrived_at,
                left_at: None,
            },
            status,
        )
    }

    fn record(id: i64, kind: OccupancyKind, status: OccupancyStatus) -> OccupancyRecord {
        OccupancyRecord {
            id,
            table_id: 1,
            branch_id: 1,
            customer_id: None,
            status,
            kind,
            party_size: None,
            notes: None,
            customer_name: Some(format!("guest-{id}")),
            national_id: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_scheduled_occupies_only_inside_window() {
        let r = scheduled(1, 100 * MIN, Some(200 * MIN), OccupancyStatus::Pending);
        assert!(!occupies_now(&r, 99 * MIN));
        assert!(occupies_now(&r, 100 * MIN));
        assert!(occupies_now(&r, 199 * MIN));
        assert!(!occupies_now(&r, 200 * MIN));
    }

    #[test]
    fn test_terminal_records_never_occupy() {
        let finished = walkin(1, 0, OccupancyStatus::Finished);
        let cancelled = scheduled(2, 0, None, OccupancyStatus::Cancelled);
        assert!(!occupies_now(&finished, 10));
        assert!(!occupies_now(&cancelled, 10));
        assert!(resolve_current(&[finished, cancelled], 10).is_none());
    }

    #[test]
    fn test_walkin_beats_scheduled() {
        let records = vec![
            scheduled(1, 10 * MIN, Some(100 * MIN), OccupancyStatus::Served),
            walkin(2, 5 * MIN, OccupancyStatus::Pending),
        ];
        assert_eq!(resolve_current(&records, 20 * MIN).map(|r| r.id), Some(2));
    }

    #[test]
    fn test_latest_start_wins_then_highest_id() {
        let records = vec![
            walkin(1, 10 * MIN, OccupancyStatus::Pending),
            walkin(2, 30 * MIN, OccupancyStatus::Served),
            walkin(3, 30 * MIN, OccupancyStatus::Pending),
            walkin(4, 20 * MIN, OccupancyStatus::Pending),
        ];
        assert_eq!(resolve_current(&records, 40 * MIN).map(|r| r.id), Some(3));
    }

    #[test]
    fn test_future_reservation_is_not_current_but_is_next() {
        let records = vec![
            scheduled(1, 60 * MIN, Some(120 * MIN), OccupancyStatus::Pending),
            scheduled(2, 30 * MIN, Some(50 * MIN), OccupancyStatus::Pending),
            scheduled(3, 20 * MIN, Some(25 * MIN), OccupancyStatus::Cancelled),
        ];
        let now = 10 * MIN;
        assert!(resolve_current(&records, now).is_none());

        let next = next_scheduled(&records, now).unwrap();
        assert_eq!(next.record_id, 2);
        assert_eq!(next.start, 30 * MIN);
        assert_eq!(next.customer.as_deref(), Some("guest-2"));
    }

    #[test]
    fn test_walkins_are_not_upcoming() {
        let records = vec![walkin(1, 100 * MIN, OccupancyStatus::Pending)];
        assert!(next_scheduled(&records, 0).is_none());
    }
}
