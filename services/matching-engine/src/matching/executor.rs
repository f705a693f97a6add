//! Trade execution logic
//!
//! Handles full and partial matches, generates trades, calculates fees

use rust_decimal::Decimal;
use types::fee::FeeSchedule;
use types::ids::{MarketId, OrderId};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

/// Match executor for handling trade generation
///
/// Owns the global trade sequence counter and the fee schedule. Every
/// trade it produces carries the next sequence number; numbers are
/// never reused even across matches of different incoming orders.
pub struct MatchExecutor {
    sequence_counter: u64,
    fees: FeeSchedule,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64, fees: FeeSchedule) -> Self {
        Self {
            sequence_counter: starting_sequence,
            fees,
        }
    }

    /// Get next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Execute a trade between maker and taker orders
    ///
    /// `price` is the maker's resting price, `side` is the taker's side.
    /// Returns a Trade struct with all details including fees.
    #[allow(clippy::too_many_arguments)]
    pub fn execute_trade(
        &mut self,
        symbol: MarketId,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
        executed_at: i64,
    ) -> Trade {
        let (maker_fee, taker_fee) = self.calculate_fees(price, quantity);
        let sequence = self.next_sequence();

        Trade::new(
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
        )
    }

    /// Calculate maker and taker fees
    ///
    /// Fee formula: fee = quantity × price × fee_rate, computed exactly
    /// with no rounding. A negative maker rate yields a negative fee,
    /// which is a rebate.
    fn calculate_fees(&self, price: Price, quantity: Quantity) -> (Decimal, Decimal) {
        let trade_value = quantity.as_decimal() * price.as_decimal();

        let maker_fee = self.fees.calculate_maker_fee(trade_value);
        let taker_fee = self.fees.calculate_taker_fee(trade_value);

        (maker_fee, taker_fee)
    }
}
