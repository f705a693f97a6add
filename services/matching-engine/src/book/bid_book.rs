//! Bid (buy-side) order book
//!
//! Maintains buy orders sorted by price descending (best bid first).
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::PriceLevel;

/// Bid (buy) side order book
///
/// Orders are sorted by price descending, so the highest bid is first.
/// At each price level, orders are maintained in FIFO order.
#[derive(Debug, Clone)]
pub struct BidBook {
    /// Price levels sorted descending (highest price first)
    /// Using BTreeMap ensures deterministic iteration
    levels: BTreeMap<Price, PriceLevel>,
    /// Number of resting orders across all levels
    order_count: usize,
}

impl BidBook {
    /// Create a new empty bid book
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            order_count: 0,
        }
    }

    /// Insert an order into the bid book
    pub fn insert(&mut self, order: &Order) {
        let level = self.levels.entry(order.price).or_insert_with(PriceLevel::new);
        level.insert(
            order.order_id.clone(),
            order.remaining_quantity,
            order.submitted_at,
        );
        self.order_count += 1;
    }

    /// Remove an order from the bid book
    ///
    /// Returns true if the order was found and removed
    pub fn remove(&mut self, order_id: &OrderId, price: Price) -> bool {
        if let Some(level) = self.levels.get_mut(&price) {
            if level.remove(order_id).is_some() {
                self.order_count -= 1;
                // Remove empty price levels to keep book clean
                if level.is_empty() {
                    self.levels.remove(&price);
                }
                return true;
            }
        }
        false
    }

    /// Get the best resting order: highest price, then first in at that price
    pub fn best_order(&self) -> Option<(Price, OrderId, Quantity)> {
        // BTreeMap iter is ascending, so we need next_back()
        self.levels.iter().next_back().and_then(|(price, level)| {
            level
                .peek_front()
                .map(|entry| (*price, entry.order_id.clone(), entry.remaining_quantity))
        })
    }

    /// Fill the best resting order by `quantity`
    ///
    /// Returns true when the maker was fully consumed and removed.
    /// Emptied price levels are removed so the next best level is
    /// immediately visible to the match loop.
    pub fn fill_best(&mut self, quantity: Quantity) -> bool {
        let (price, level) = self
            .levels
            .iter_mut()
            .next_back()
            .expect("fill_best on empty bid book");
        let price = *price;

        let consumed = level.fill_front(quantity);
        if consumed {
            self.order_count -= 1;
            if level.is_empty() {
                self.levels.remove(&price);
            }
        }
        consumed
    }

    /// Get the best bid (highest price) and its total quantity
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.levels
            .iter()
            .next_back()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    /// Get the best bid price
    pub fn best_bid_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Get depth snapshot (top N price levels)
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .rev() // Reverse to get highest prices first
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Check if the bid book is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of resting orders
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    /// Get the total number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

impl Default for BidBook {
    fn default() -> Self {
        Self::new()
    }
}
