//! ReportingViews - 经营报表 (只读)

use shared::models::{BranchActivity, TopCustomer, TopProduct, TopReservationCustomer};
use sqlx::SqlitePool;

use crate::core::{EngineError, EngineResult};
use crate::db::repository::report;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
/// Default size of the reservation ranking
pub const DEFAULT_RESERVATION_LIMIT: i64 = 5;

#[derive(Clone)]
pub struct ReportingViews {
    pool: SqlitePool,
}

impl ReportingViews {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Best sellers by quantity
    pub async fn top_products(&self, limit: Option<i64>) -> EngineResult<Vec<TopProduct>> {
        Ok(report::top_products(&self.pool, check_limit(limit)?).await?)
    }

    /// Most frequent customers by order count
    pub async fn top_customers(&self, limit: Option<i64>) -> EngineResult<Vec<TopCustomer>> {
        Ok(report::top_customers(&self.pool, check_limit(limit)?).await?)
    }

    /// Customers with the most reservations, with their favorite per category
    pub async fn top_reservation_customers(&self, limit: Option<i64>) -> EngineResult<Vec<TopReservationCustomer>> {
        let limit = check_limit(Some(limit.unwrap_or(DEFAULT_RESERVATION_LIMIT)))?;
        Ok(report::top_reservation_customers(&self.pool, limit).await?)
    }

    pub async fn branch_activity(&self) -> EngineResult<Vec<BranchActivity>> {
        Ok(report::branch_activity(&self.pool).await?)
    }
}

fn check_limit(limit: Option<i64>) -> EngineResult<i64> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(EngineError::invalid(format!("limit must be between 1 and {MAX_LIMIT}")));
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::FavoritesAggregator;
    use crate::occupancy::{LedgerSettings, OccupancyLedger};
    use crate::orders::OrderLedger;
    use crate::test_support::{seed_product, setup, utc};
    use chrono_tz::Tz;
    use shared::models::{OccupancyStatus, OrderCreate, OrderLineInput, ReservationCreate, WalkinCreate};

    fn line(product_id: i64, quantity: i64) -> OrderLineInput {
        OrderLineInput {
            product_id,
            quantity: Some(quantity),
        }
    }

    #[tokio::test]
    async fn test_reports() {
        let (pool, clock) = setup(utc(2024, 1, 1, 12, 0)).await;
        seed_product(&pool, 1, "Horchata", "drink", 10.0, true).await;
        seed_product(&pool, 2, "Galleta", "cookie", 2.5, true).await;
        let occupancy = OccupancyLedger::new(pool.clone(), clock.clone(), LedgerSettings::default());
        let orders = OrderLedger::new(pool.clone(), clock.clone(), Tz::UTC);
        let reports = ReportingViews::new(pool.clone());

        for (national_id, items) in [
            ("1001", vec![line(1, 1), line(2, 4)]),
            ("1001", vec![line(2, 2)]),
            ("2002", vec![line(1, 3)]),
        ] {
            occupancy
                .create_walkin(WalkinCreate {
                    table_id: 1,
                    branch_id: None,
                    national_id: Some(national_id.into()),
                    name: None,
                    phone: None,
                    email: None,
                    party_size: None,
                    notes: None,
                })
                .await
                .unwrap();
            orders.open_order(OrderCreate { table_id: 1, items }).await.unwrap();
            occupancy.advance_status(1, OccupancyStatus::Finished).await.unwrap();
            clock.advance_minutes(10);
        }

        let products = reports.top_products(None).await.unwrap();
        assert_eq!(products[0].product_id, 2);
        assert_eq!(products[0].quantity_sold, 6);
        assert_eq!(products[0].revenue, 15.0);
        assert_eq!(products[1].quantity_sold, 4);

        let customers = reports.top_customers(Some(1)).await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].national_id, "1001");
        assert_eq!(customers[0].order_count, 2);
        assert_eq!(customers[0].total_spent, 25.0);

        let branches = reports.branch_activity().await.unwrap();
        assert_eq!(branches[0].order_count, 3);
        assert_eq!(branches[0].revenue, 55.0);
        assert_eq!(branches[0].walkin_count, 3);
        assert_eq!(branches[0].reservation_count, 0);

        assert!(reports.top_products(Some(0)).await.is_err());
    }

    fn booking(national_id: &str, start: i64) -> ReservationCreate {
        ReservationCreate {
            table_id: 2,
            branch_id: Some(1),
            national_id: Some(national_id.into()),
            name: None,
            phone: None,
            email: None,
            start,
            end: start + 60 * 60 * 1000,
            party_size: Some(2),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_top_reservation_customers_with_favorites() {
        let (pool, clock) = setup(utc(2024, 1, 1, 9, 0)).await;
        seed_product(&pool, 1, "Horchata", "drink", 10.0, true).await;
        let occupancy = OccupancyLedger::new(pool.clone(), clock.clone(), LedgerSettings::default());
        let orders = OrderLedger::new(pool.clone(), clock.clone(), Tz::UTC);
        let favorites = FavoritesAggregator::new(pool.clone(), clock.clone());
        let reports = ReportingViews::new(pool.clone());

        occupancy.create_reservation(booking("1001", utc(2024, 1, 2, 12, 0))).await.unwrap();
        occupancy.create_reservation(booking("1001", utc(2024, 1, 3, 12, 0))).await.unwrap();
        occupancy.create_reservation(booking("2002", utc(2024, 1, 4, 12, 0))).await.unwrap();

        // walk-ins do not count as reservations
        for _ in 0..3 {
            occupancy
                .create_walkin(WalkinCreate {
                    table_id: 1,
                    branch_id: None,
                    national_id: Some("2002".into()),
                    name: None,
                    phone: None,
                    email: None,
                    party_size: None,
                    notes: None,
                })
                .await
                .unwrap();
            orders
                .open_order(OrderCreate {
                    table_id: 1,
                    items: vec![line(1, 1)],
                })
                .await
                .unwrap();
            occupancy.advance_status(1, OccupancyStatus::Finished).await.unwrap();
            clock.advance_minutes(5);
        }
        favorites.recompute("2002").await.unwrap();

        let top = reports.top_reservation_customers(None).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].national_id, "1001");
        assert_eq!(top[0].reservation_count, 2);
        assert_eq!(top[0].favorite_drink, None);
        assert_eq!(top[1].national_id, "2002");
        assert_eq!(top[1].reservation_count, 1);
        assert_eq!(top[1].favorite_drink.as_deref(), Some("Horchata"));
        assert_eq!(top[1].favorite_cookie, None);

        assert_eq!(reports.top_reservation_customers(Some(1)).await.unwrap().len(), 1);
        assert!(reports.top_reservation_customers(Some(101)).await.is_err());
    }
}
