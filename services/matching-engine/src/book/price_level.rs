//! Price level implementation with FIFO queue
//!
//! A price level contains all resting orders at a specific price point.
//! Orders are maintained in FIFO (First-In-First-Out) order to enforce
//! time priority: a partially filled order keeps its place at the front
//! of the queue, it is never re-queued.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::numeric::Quantity;

/// A price level containing orders at a specific price
///
/// Maintains strict FIFO ordering for time-priority matching.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Queue of orders at this price level (FIFO order)
    orders: VecDeque<LevelEntry>,
    /// Total quantity available at this level
    total_quantity: Quantity,
}

/// Entry in the price level queue
#[derive(Debug, Clone)]
pub struct LevelEntry {
    pub order_id: OrderId,
    pub remaining_quantity: Quantity,
    pub submitted_at: i64,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
            total_quantity: Quantity::zero(),
        }
    }

    /// Insert an order at the back of the queue (time priority)
    pub fn insert(&mut self, order_id: OrderId, quantity: Quantity, submitted_at: i64) {
        self.orders.push_back(LevelEntry {
            order_id,
            remaining_quantity: quantity,
            submitted_at,
        });
        self.total_quantity = self.total_quantity + quantity;
    }

    /// Remove an order from the queue by OrderId
    ///
    /// Returns the remaining quantity of the removed order, or None if not found
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Quantity> {
        let position = self
            .orders
            .iter()
            .position(|entry| &entry.order_id == order_id)?;
        let entry = self.orders.remove(position)?;

        self.total_quantity = self
            .total_quantity
            .checked_sub(entry.remaining_quantity)
            .unwrap_or(Quantity::zero());

        Some(entry.remaining_quantity)
    }

    /// Peek at the front order without removing it
    pub fn peek_front(&self) -> Option<&LevelEntry> {
        self.orders.front()
    }

    /// Fill the front order by `quantity`
    ///
    /// A fully consumed entry is removed from the queue so it is never
    /// revisited. Returns true when the front order was fully consumed.
    ///
    /// # Panics
    /// Panics if `quantity` exceeds the front order's remaining quantity
    /// or the level is empty; matching sizes every fill by `min`, so a
    /// violation is an engine bug.
    pub fn fill_front(&mut self, quantity: Quantity) -> bool {
        let entry = self.orders.front_mut().expect("fill on empty price level");
        let new_remaining = entry
            .remaining_quantity
            .checked_sub(quantity)
            .expect("fill exceeds front order remaining quantity");

        self.total_quantity = self
            .total_quantity
            .checked_sub(quantity)
            .unwrap_or(Quantity::zero());

        if new_remaining.is_zero() {
            self.orders.pop_front();
            true
        } else {
            entry.remaining_quantity = new_remaining;
            false
        }
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the total quantity at this price level
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Get the number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

impl Default for PriceLevel {
    fn default() -> Self {
        Self::new()
    }
}
