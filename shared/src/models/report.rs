//! Reporting rows (read-only aggregates)

use serde::{Deserialize, Serialize};

/// Best selling product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TopProduct {
    pub product_id: i64,
    pub product_name: String,
    pub quantity_sold: i64,
    pub revenue: f64,
}

/// Most frequent customer by order count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TopCustomer {
    pub customer_id: i64,
    pub national_id: String,
    pub name: Option<String>,
    pub order_count: i64,
    pub total_spent: f64,
}

/// Order and booking volume of one branch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BranchActivity {
    pub branch_id: i64,
    pub branch_name: String,
    pub order_count: i64,
    pub revenue: f64,
    pub reservation_count: i64,
    pub walkin_count: i64,
}

/// Customer ranked by reservations, with their cached favorites
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TopReservationCustomer {
    pub customer_id: i64,
    pub national_id: String,
    pub name: Option<String>,
    pub reservation_count: i64,
    pub favorite_drink: Option<String>,
    pub favorite_cookie: Option<String>,
    pub favorite_savory: Option<String>,
}
