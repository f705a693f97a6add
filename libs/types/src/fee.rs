//! Fee calculation types
//!
//! Fees are a fraction of executed notional (quantity × execution
//! price). The taker rate is a cost; the maker rate may be negative,
//! which represents a liquidity rebate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maker/taker fee rates applied to every match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Rate charged to the resting side; negative means rebate
    pub maker_rate: Decimal,
    /// Rate charged to the incoming side
    pub taker_rate: Decimal,
}

impl FeeSchedule {
    /// Create a fee schedule from raw rates
    pub fn new(maker_rate: Decimal, taker_rate: Decimal) -> Self {
        Self {
            maker_rate,
            taker_rate,
        }
    }

    /// Calculate the maker fee for a trade value
    pub fn calculate_maker_fee(&self, trade_value: Decimal) -> Decimal {
        trade_value * self.maker_rate
    }

    /// Calculate the taker fee for a trade value
    pub fn calculate_taker_fee(&self, trade_value: Decimal) -> Decimal {
        trade_value * self.taker_rate
    }
}

impl Default for FeeSchedule {
    /// 0% maker, 0.05% taker
    fn default() -> Self {
        Self {
            maker_rate: Decimal::ZERO,
            taker_rate: Decimal::new(5, 4),
        }
    }
}
