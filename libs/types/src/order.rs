//! Order lifecycle types
//!
//! A limit order moves from `Pending` through zero or more fills to one
//! of the terminal states (`Filled`, `Canceled`, `Rejected`). Quantity
//! bookkeeping maintains `filled + remaining == quantity` at every step.

use crate::ids::OrderId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::BUY => write!(f, "BUY"),
            Side::SELL => write!(f, "SELL"),
        }
    }
}

/// Order status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason")]
pub enum OrderStatus {
    /// Accepted and awaiting matching
    #[serde(rename = "PENDING")]
    Pending,

    /// Partially matched
    #[serde(rename = "PARTIAL")]
    Partial,

    /// Completely matched (terminal)
    #[serde(rename = "FILLED")]
    Filled,

    /// Canceled by the owner (terminal)
    #[serde(rename = "CANCELED")]
    Canceled,

    /// Refused by the engine (terminal)
    #[serde(rename = "REJECTED")]
    Rejected(RejectReason),
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Canceled | OrderStatus::Rejected(_)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Partial => write!(f, "PARTIAL"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Canceled => write!(f, "CANCELED"),
            OrderStatus::Rejected(reason) => write!(f, "REJECTED({reason:?})"),
        }
    }
}

/// Reject reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// The resting side of the book is at capacity
    BookCapacity,
    /// An order with the same identifier is already resting
    DuplicateOrderId,
}

/// A limit order
///
/// `quantity` is the originally submitted amount and never changes;
/// fills move amounts from `remaining_quantity` into `filled_quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub filled_quantity: Quantity,
    pub remaining_quantity: Quantity,
    pub status: OrderStatus,
    /// Submission-order key, monotonic per submission; used only for
    /// time-priority tie-break, never interpreted as wall-clock time.
    pub submitted_at: i64,
}

impl Order {
    /// Create a new pending order from a validated request
    pub fn new(
        order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
        submitted_at: i64,
    ) -> Self {
        Self {
            order_id,
            side,
            price,
            quantity,
            filled_quantity: Quantity::zero(),
            remaining_quantity: quantity,
            status: OrderStatus::Pending,
            submitted_at,
        }
    }

    /// Check quantity invariant: filled + remaining = total
    pub fn check_invariant(&self) -> bool {
        self.filled_quantity.as_decimal() + self.remaining_quantity.as_decimal()
            == self.quantity.as_decimal()
    }

    /// Check if order is completely filled
    pub fn is_filled(&self) -> bool {
        self.filled_quantity == self.quantity
    }

    /// Check if order has any fills
    pub fn has_fills(&self) -> bool {
        !self.filled_quantity.is_zero()
    }

    /// Update filled quantity and adjust status
    ///
    /// # Panics
    /// Panics if the fill would exceed total quantity. Matching bounds
    /// every fill by `min(taker remaining, maker remaining)`, so a
    /// violation here is an engine bug, not an input error.
    pub fn add_fill(&mut self, fill_quantity: Quantity) {
        let new_filled = self.filled_quantity + fill_quantity;

        assert!(
            new_filled.as_decimal() <= self.quantity.as_decimal(),
            "Fill would exceed order quantity"
        );

        self.filled_quantity = new_filled;
        self.remaining_quantity = self
            .quantity
            .checked_sub(new_filled)
            .unwrap_or(Quantity::zero());

        if self.is_filled() {
            self.status = OrderStatus::Filled;
        } else if self.has_fills() {
            self.status = OrderStatus::Partial;
        }

        assert!(self.check_invariant(), "Invariant violated after fill");
    }

    /// Cancel the order
    ///
    /// # Panics
    /// Panics if order is already in terminal state
    pub fn cancel(&mut self) {
        assert!(!self.status.is_terminal(), "Cannot cancel terminal order");
        self.status = OrderStatus::Canceled;
    }

    /// Reject the order
    ///
    /// # Panics
    /// Panics if order is already in terminal state
    pub fn reject(&mut self, reason: RejectReason) {
        assert!(!self.status.is_terminal(), "Cannot reject terminal order");
        self.status = OrderStatus::Rejected(reason);
    }
}
