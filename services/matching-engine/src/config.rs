//! Engine configuration
//!
//! Supplied once at construction and immutable thereafter.

use serde::{Deserialize, Serialize};
use types::fee::FeeSchedule;

/// Matching engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on resting orders per book side
    pub max_book_depth: usize,
    /// Maker/taker fee rates applied to every match
    pub fees: FeeSchedule,
    /// First trade sequence number the engine will assign
    pub starting_sequence: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_book_depth: 10_000,
            fees: FeeSchedule::default(),
            starting_sequence: 0,
        }
    }
}
