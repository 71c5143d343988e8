//! Customer Model (顾客)

use serde::{Deserialize, Serialize};

/// Customer identity, keyed by a national-ID-like string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub national_id: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Upsert customer payload
///
/// `None` fields never blank existing data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpsert {
    pub national_id: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Free-text feedback left by a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomerComment {
    pub id: i64,
    pub customer_id: i64,
    /// Latest occupancy record of the customer at the time of writing
    pub occupancy_id: Option<i64>,
    pub comment: String,
    pub created_at: i64,
}

/// Create comment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreate {
    pub comment: String,
}

/// One ordered line in a customer's history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomerHistoryEntry {
    pub order_id: i64,
    pub ordered_at: i64,
    pub branch_id: i64,
    pub table_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
}
