//! Engine event stream
//!
//! Every state change in the engine is announced through an
//! [`EventSink`] supplied at construction. The sink is a seam: the
//! engine stays decoupled from transport so callers can wire events to
//! a message bus, persistence, or nothing at all.

use serde::{Deserialize, Serialize};
use types::ids::OrderId;
use types::order::{Order, RejectReason};
use types::trade::Trade;

/// Events emitted by the matching engine, in the order they occur
///
/// For a single submission the order is always: `OrderSubmitted`, then
/// zero or more `TradeExecuted`, then at most one of `OrderRested` or
/// `OrderRejected`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineEvent {
    /// An order passed validation and entered matching
    OrderSubmitted { order: Order },
    /// A match produced a trade
    TradeExecuted { trade: Trade },
    /// The unmatched remainder of an order was added to the book
    OrderRested { order: Order },
    /// A resting order was removed at the owner's request
    OrderCanceled { order_id: OrderId },
    /// The engine refused an order or its remainder
    OrderRejected {
        order_id: OrderId,
        reason: RejectReason,
    },
}

/// Consumer of engine events
pub trait EventSink {
    fn publish(&mut self, event: EngineEvent);
}

/// Sink that drops every event
///
/// Used when the caller only needs return values.
#[derive(Debug, Default, Clone)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: EngineEvent) {}
}

/// Sink that buffers every event in memory
///
/// Used in tests and by callers that drain events after each call.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<EngineEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered events, leaving the sink empty
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for RecordingSink {
    fn publish(&mut self, event: EngineEvent) {
        self.events.push(event);
    }
}
