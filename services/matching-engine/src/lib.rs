//! Matching Engine Service
//!
//! Single-instrument order matching engine implementing strict
//! price-time priority over an in-memory limit order book.
//!
//! **Key Invariants:**
//! - Price-time priority strictly enforced (best price first, FIFO
//!   within a price level)
//! - Execution price is always the maker's resting price
//! - Deterministic matching (same inputs → same outputs)
//! - Conservation of quantity across fills and resting remainders
//! - A resting order always has remaining quantity greater than zero

pub mod book;
pub mod config;
pub mod engine;
pub mod events;
pub mod matching;

pub use config::EngineConfig;
pub use engine::{EngineStatus, MatchingEngine, OrderBookSnapshot, SubmitResult};
pub use events::{EngineEvent, EventSink, NullSink, RecordingSink};
