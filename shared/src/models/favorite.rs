//! Customer Favorite Models (常点)

use serde::{Deserialize, Serialize};

use super::product::ProductCategory;

/// Cached favorite of one customer in one category
///
/// A cleared slot keeps its row with all product fields `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FavoriteEntry {
    pub customer_id: i64,
    pub category: ProductCategory,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub order_count: Option<i64>,
    pub updated_at: i64,
}

/// Favorite product shown in one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritePick {
    pub product_id: i64,
    pub product_name: String,
    pub order_count: i64,
}

/// The three category slots of a customer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteSlots {
    pub drink: Option<FavoritePick>,
    pub cookie: Option<FavoritePick>,
    pub savory: Option<FavoritePick>,
}

impl FavoriteSlots {
    pub fn get(&self, category: ProductCategory) -> Option<&FavoritePick> {
        match category {
            ProductCategory::Drink => self.drink.as_ref(),
            ProductCategory::Cookie => self.cookie.as_ref(),
            ProductCategory::Savory => self.savory.as_ref(),
        }
    }

    pub fn set(&mut self, category: ProductCategory, pick: Option<FavoritePick>) {
        match category {
            ProductCategory::Drink => self.drink = pick,
            ProductCategory::Cookie => self.cookie = pick,
            ProductCategory::Savory => self.savory = pick,
        }
    }
}
