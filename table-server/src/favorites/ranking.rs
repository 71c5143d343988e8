//! Favorite ranking
//!
//! Per category: most order lines first, then the most recently ordered, then
//! the lowest product id. A category with no history yields an empty slot.

use std::cmp::Reverse;

use shared::models::{FavoritePick, FavoriteSlots, ProductCategory};

use crate::db::repository::favorite::ProductHistory;

pub fn rank(history: &[ProductHistory]) -> FavoriteSlots {
    let mut slots = FavoriteSlots::default();
    for category in ProductCategory::ALL {
        slots.set(category, best_in(history, category));
    }
    slots
}

fn best_in(history: &[ProductHistory], category: ProductCategory) -> Option<FavoritePick> {
    history
        .iter()
        .filter(|h| h.category == category && h.order_count > 0)
        .min_by_key(|h| (Reverse(h.order_count), Reverse(h.last_ordered_at), h.product_id))
        .map(|h| FavoritePick {
            product_id: h.product_id,
            product_name: h.product_name.clone(),
            order_count: h.order_count,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(product_id: i64, category: ProductCategory, order_count: i64, last_ordered_at: i64) -> ProductHistory {
        ProductHistory {
            product_id,
            product_name: format!("p{product_id}"),
            category,
            order_count,
            last_ordered_at,
        }
    }

    #[test]
    fn test_highest_count_wins() {
        let slots = rank(&[
            h(1, ProductCategory::Drink, 2, 500),
            h(2, ProductCategory::Drink, 5, 100),
        ]);
        assert_eq!(slots.drink.unwrap().product_id, 2);
    }

    #[test]
    fn test_tie_broken_by_recency_then_id() {
        let slots = rank(&[
            h(1, ProductCategory::Cookie, 3, 100),
            h(2, ProductCategory::Cookie, 3, 300),
            h(5, ProductCategory::Savory, 1, 100),
            h(4, ProductCategory::Savory, 1, 100),
        ]);
        assert_eq!(slots.cookie.unwrap().product_id, 2);
        assert_eq!(slots.savory.unwrap().product_id, 4);
    }

    #[test]
    fn test_category_without_history_is_empty() {
        let slots = rank(&[h(1, ProductCategory::Drink, 1, 100)]);
        assert!(slots.drink.is_some());
        assert!(slots.cookie.is_none());
        assert!(slots.savory.is_none());
        assert_eq!(rank(&[]), FavoriteSlots::default());
    }
}
