//! Trade execution types
//!
//! A `Trade` is the immutable record of one execution between a resting
//! (maker) order and an incoming (taker) order. The engine emits trades
//! and does not retain them; downstream consumers own them from there.

use crate::ids::{MarketId, OrderId, TradeId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An atomic execution between maker and taker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    /// Global monotonic sequence, never reused
    pub sequence: u64,
    pub symbol: MarketId,

    // Order references
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,

    // Trade details (side is the taker's)
    pub side: Side,
    /// Execution price: always the maker's resting price
    pub price: Price,
    pub quantity: Quantity,

    // Signed fees; a negative maker fee is a rebate
    pub maker_fee: Decimal,
    pub taker_fee: Decimal,

    /// Taker submission key at execution time
    pub executed_at: i64,
}

impl Trade {
    /// Create a new trade
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        symbol: MarketId,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
        maker_fee: Decimal,
        taker_fee: Decimal,
        executed_at: i64,
    ) -> Self {
        Self {
            trade_id: TradeId::new(),
            sequence,
            symbol,
            maker_order_id,
            taker_order_id,
            side,
            price,
            quantity,
            maker_fee,
            taker_fee,
            executed_at,
        }
    }

    /// Calculate trade value (price × quantity)
    pub fn trade_value(&self) -> Decimal {
        self.quantity.as_decimal() * self.price.as_decimal()
    }
}
