//! Product Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product category
///
/// Favorites are tracked for exactly these three categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum ProductCategory {
    Drink,
    Cookie,
    Savory,
}

impl ProductCategory {
    /// All categories, in display order
    pub const ALL: [ProductCategory; 3] = [Self::Drink, Self::Cookie, Self::Savory];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drink => "drink",
            Self::Cookie => "cookie",
            Self::Savory => "savory",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drink" => Ok(Self::Drink),
            "cookie" => Ok(Self::Cookie),
            "savory" => Ok(Self::Savory),
            other => Err(format!("unknown product category: {other}")),
        }
    }
}

/// Catalog entry. Branch independent, read-only for the occupancy/order core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: ProductCategory,
    pub price: f64,
    pub available: bool,
}
