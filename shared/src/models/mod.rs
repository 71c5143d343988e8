//! Data models
//!
//! Shared between the table server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all timestamps Unix millis.

pub mod branch;
pub mod customer;
pub mod dining_table;
pub mod favorite;
pub mod inventory;
pub mod occupancy;
pub mod order;
pub mod product;
pub mod report;

// Re-exports
pub use branch::*;
pub use customer::*;
pub use dining_table::*;
pub use favorite::*;
pub use inventory::*;
pub use occupancy::*;
pub use order::*;
pub use product::*;
pub use report::*;
