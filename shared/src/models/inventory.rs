//! Inventory Lot Models (入库批次)

use serde::{Deserialize, Serialize};

/// Freshness state of a received lot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum LotState {
    #[default]
    Fresh,
    Frozen,
    Damaged,
}

/// Register lot payload (manager only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotCreate {
    pub ingredient_id: i64,
    pub branch_id: i64,
    pub supplier_id: i64,
    pub quantity: f64,
    /// Expiry date (YYYY-MM-DD)
    pub expires_on: String,
    #[serde(default)]
    pub lot_state: LotState,
    /// Receipt time (Unix millis), defaults to now
    pub received_at: Option<i64>,
}

/// Stored inventory lot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryLot {
    pub id: i64,
    pub ingredient_id: i64,
    pub branch_id: i64,
    pub supplier_id: i64,
    pub quantity: f64,
    pub expires_on: String,
    pub lot_state: LotState,
    pub received_at: i64,
}

/// Stock-keeping ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    /// kg, l, unit...
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: i64,
    pub name: String,
}
