//! Branch Model (门店)

use serde::{Deserialize, Serialize};

/// Restaurant branch. Every dining table belongs to exactly one branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Branch {
    pub id: i64,
    pub name: String,
}
