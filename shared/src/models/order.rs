//! Order Models (订单)

use serde::{Deserialize, Serialize};

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    Open,
    Closed,
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderType {
    DineIn,
    Takeaway,
}

/// Order header
///
/// `total` is never entered directly: it is always the sum of the lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub table_id: i64,
    pub branch_id: i64,
    pub customer_id: Option<i64>,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub total: f64,
    pub created_at: i64,
}

/// Order line with the unit price snapshotted at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
}

/// Requested line of a new order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub product_id: i64,
    /// Missing or below 1 is clamped to 1
    pub quantity: Option<i64>,
}

/// Open order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_id: i64,
    pub items: Vec<OrderLineInput>,
}

/// Order header together with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

/// Response of a successful open-order call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: i64,
    pub customer_id: Option<i64>,
    pub total: f64,
    pub line_count: usize,
}
