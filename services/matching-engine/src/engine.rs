//! Matching engine core
//!
//! Main coordinator for order book and matching logic. One engine
//! instance owns one instrument; callers hold `&mut` access, so all
//! operations run to completion before the next one starts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use types::errors::{EngineError, OrderError};
use types::ids::{MarketId, OrderId};
use types::numeric::{Price, Quantity};
use types::order::{Order, RejectReason, Side};
use types::trade::Trade;

use crate::book::{AskBook, BidBook};
use crate::config::EngineConfig;
use crate::events::{EngineEvent, EventSink};
use crate::matching::crossing;
use crate::matching::executor::MatchExecutor;

/// Main matching engine for a single instrument
pub struct MatchingEngine<S: EventSink> {
    symbol: MarketId,
    config: EngineConfig,
    bids: BidBook,
    asks: AskBook,
    /// Resting-order index for O(1) lookup on cancel and duplicate checks
    order_locations: HashMap<OrderId, (Price, Side)>,
    executor: MatchExecutor,
    total_matches: u64,
    sink: S,
}

/// Result of submitting an order
#[derive(Debug, Clone)]
pub enum SubmitResult {
    /// No match; the whole order was added to the book
    Resting { order: Order },
    /// Some quantity matched, the remainder rests on the book
    PartiallyFilled { trades: Vec<Trade>, resting: Order },
    /// The order was completely filled
    Filled { trades: Vec<Trade> },
    /// Fills (if any) stand, but the remainder was refused at capacity
    RemainderRejected { trades: Vec<Trade>, rejected: Order },
}

/// Aggregate engine counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Resting orders on the buy side
    pub bids: usize,
    /// Resting orders on the sell side
    pub asks: usize,
    /// Trades executed since construction
    pub total_matches: u64,
}

/// Order book snapshot for market data
#[derive(Debug, Clone, Serialize)]
pub struct OrderBookSnapshot {
    pub symbol: MarketId,
    /// Best bid first (highest price)
    pub bids: Vec<(Price, Quantity)>,
    /// Best ask first (lowest price)
    pub asks: Vec<(Price, Quantity)>,
}

impl<S: EventSink> MatchingEngine<S> {
    /// Create a new matching engine for `symbol`
    pub fn new(symbol: MarketId, config: EngineConfig, sink: S) -> Self {
        info!(
            symbol = %symbol,
            max_book_depth = config.max_book_depth,
            starting_sequence = config.starting_sequence,
            "matching engine created"
        );
        let executor = MatchExecutor::new(config.starting_sequence, config.fees);
        Self {
            symbol,
            config,
            bids: BidBook::new(),
            asks: AskBook::new(),
            order_locations: HashMap::new(),
            executor,
            total_matches: 0,
            sink,
        }
    }

    /// Submit an order to the matching engine
    ///
    /// The order is matched against the opposite side of the book in
    /// price-time priority. Any unmatched remainder rests on its own
    /// side, unless that side is at capacity, in which case the
    /// remainder is rejected while completed fills stand.
    pub fn submit_order(&mut self, mut order: Order) -> Result<SubmitResult, EngineError> {
        if self.order_locations.contains_key(&order.order_id) {
            return Err(OrderError::DuplicateOrderId {
                order_id: order.order_id.to_string(),
            }
            .into());
        }

        self.sink.publish(EngineEvent::OrderSubmitted {
            order: order.clone(),
        });

        let trades = self.match_incoming(&mut order);

        if order.is_filled() {
            debug!(order_id = %order.order_id, fills = trades.len(), "order fully filled");
            return Ok(SubmitResult::Filled { trades });
        }

        let own_side_count = match order.side {
            Side::BUY => self.bids.order_count(),
            Side::SELL => self.asks.order_count(),
        };
        if own_side_count >= self.config.max_book_depth {
            order.reject(RejectReason::BookCapacity);
            self.sink.publish(EngineEvent::OrderRejected {
                order_id: order.order_id.clone(),
                reason: RejectReason::BookCapacity,
            });
            debug!(
                order_id = %order.order_id,
                side = %order.side,
                "remainder rejected at book capacity"
            );
            return Ok(SubmitResult::RemainderRejected {
                trades,
                rejected: order,
            });
        }

        match order.side {
            Side::BUY => self.bids.insert(&order),
            Side::SELL => self.asks.insert(&order),
        }
        self.order_locations
            .insert(order.order_id.clone(), (order.price, order.side));
        self.sink.publish(EngineEvent::OrderRested {
            order: order.clone(),
        });
        debug!(
            order_id = %order.order_id,
            side = %order.side,
            price = %order.price,
            remaining = %order.remaining_quantity,
            "order resting"
        );

        if trades.is_empty() {
            Ok(SubmitResult::Resting { order })
        } else {
            Ok(SubmitResult::PartiallyFilled {
                trades,
                resting: order,
            })
        }
    }

    /// Match an incoming order against the opposite book
    ///
    /// Walks best price first, FIFO within a level. Stops at the first
    /// maker whose price no longer crosses; levels behind it cannot
    /// cross either.
    fn match_incoming(&mut self, order: &mut Order) -> Vec<Trade> {
        let mut trades = Vec::new();

        while !order.is_filled() {
            let best = match order.side {
                Side::BUY => self.asks.best_order(),
                Side::SELL => self.bids.best_order(),
            };
            let Some((maker_price, maker_order_id, maker_quantity)) = best else {
                break;
            };

            if !crossing::incoming_can_match(order.side, order.price, maker_price) {
                break;
            }

            // Execution price is always the maker's resting price
            let match_qty = if order.remaining_quantity <= maker_quantity {
                order.remaining_quantity
            } else {
                maker_quantity
            };

            let trade = self.executor.execute_trade(
                self.symbol.clone(),
                maker_order_id.clone(),
                order.order_id.clone(),
                order.side,
                maker_price,
                match_qty,
                order.submitted_at,
            );
            self.total_matches += 1;

            order.add_fill(match_qty);

            let maker_consumed = match order.side {
                Side::BUY => self.asks.fill_best(match_qty),
                Side::SELL => self.bids.fill_best(match_qty),
            };
            if maker_consumed {
                self.order_locations.remove(&maker_order_id);
            }

            debug!(
                sequence = trade.sequence,
                maker = %trade.maker_order_id,
                taker = %trade.taker_order_id,
                price = %trade.price,
                quantity = %trade.quantity,
                "trade executed"
            );
            self.sink.publish(EngineEvent::TradeExecuted {
                trade: trade.clone(),
            });
            trades.push(trade);
        }

        trades
    }

    /// Cancel a resting order
    ///
    /// Returns true if the order was resting and has been removed.
    /// Unknown and already-removed identifiers return false; repeating
    /// a cancel is a harmless no-op.
    pub fn cancel_order(&mut self, order_id: &OrderId) -> bool {
        let Some((price, side)) = self.order_locations.remove(order_id) else {
            return false;
        };

        let removed = match side {
            Side::BUY => self.bids.remove(order_id, price),
            Side::SELL => self.asks.remove(order_id, price),
        };
        debug_assert!(removed, "location index out of sync with book");

        self.sink.publish(EngineEvent::OrderCanceled {
            order_id: order_id.clone(),
        });
        debug!(order_id = %order_id, side = %side, "order canceled");
        true
    }

    /// Aggregate counters: resting orders per side and total matches
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            bids: self.bids.order_count(),
            asks: self.asks.order_count(),
            total_matches: self.total_matches,
        }
    }

    /// Price-aggregated view of the top `depth` levels on each side
    pub fn depth(&self, depth: usize) -> OrderBookSnapshot {
        OrderBookSnapshot {
            symbol: self.symbol.clone(),
            bids: self.bids.depth_snapshot(depth),
            asks: self.asks.depth_snapshot(depth),
        }
    }

    /// Best bid and best ask prices, either side may be empty
    pub fn top_of_book(&self) -> (Option<Price>, Option<Price>) {
        (self.bids.best_bid_price(), self.asks.best_ask_price())
    }

    /// Access the event sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the event sink, e.g. for draining buffers
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;

    fn test_engine() -> MatchingEngine<RecordingSink> {
        MatchingEngine::new(
            MarketId::new("BTC/USDT"),
            EngineConfig::default(),
            RecordingSink::new(),
        )
    }

    fn order(id: &str, side: Side, price: u64, qty: &str, at: i64) -> Order {
        Order::new(
            OrderId::new(id),
            side,
            Price::from_u64(price),
            Quantity::from_str(qty).unwrap(),
            at,
        )
    }

    #[test]
    fn test_engine_resting_order() {
        let mut engine = test_engine();

        let result = engine
            .submit_order(order("b1", Side::BUY, 50000, "1.0", 1))
            .unwrap();

        assert!(matches!(result, SubmitResult::Resting { .. }));
        assert_eq!(engine.status().bids, 1);
        assert_eq!(engine.status().total_matches, 0);
    }

    #[test]
    fn test_engine_full_match_at_maker_price() {
        let mut engine = test_engine();

        engine
            .submit_order(order("s1", Side::SELL, 50000, "1.0", 1))
            .unwrap();
        let result = engine
            .submit_order(order("b1", Side::BUY, 50500, "1.0", 2))
            .unwrap();

        match result {
            SubmitResult::Filled { trades } => {
                assert_eq!(trades.len(), 1);
                // Maker's resting price, not the taker's limit
                assert_eq!(trades[0].price, Price::from_u64(50000));
                assert_eq!(trades[0].quantity, Quantity::from_str("1.0").unwrap());
                assert_eq!(trades[0].maker_order_id, OrderId::new("s1"));
                assert_eq!(trades[0].taker_order_id, OrderId::new("b1"));
                assert_eq!(trades[0].side, Side::BUY);
            }
            other => panic!("Expected Filled, got {other:?}"),
        }

        let status = engine.status();
        assert_eq!(status.bids, 0);
        assert_eq!(status.asks, 0);
        assert_eq!(status.total_matches, 1);
    }

    #[test]
    fn test_engine_partial_match_rests_remainder() {
        let mut engine = test_engine();

        engine
            .submit_order(order("s1", Side::SELL, 50000, "0.5", 1))
            .unwrap();
        let result = engine
            .submit_order(order("b1", Side::BUY, 50000, "1.0", 2))
            .unwrap();

        match result {
            SubmitResult::PartiallyFilled { trades, resting } => {
                assert_eq!(trades.len(), 1);
                assert_eq!(trades[0].quantity, Quantity::from_str("0.5").unwrap());
                assert_eq!(resting.remaining_quantity, Quantity::from_str("0.5").unwrap());
                assert_eq!(resting.status, types::order::OrderStatus::Partial);
            }
            other => panic!("Expected PartiallyFilled, got {other:?}"),
        }

        // Remainder rests on the bid side
        assert_eq!(engine.status().bids, 1);
        assert_eq!(engine.status().asks, 0);
    }

    #[test]
    fn test_engine_no_cross() {
        let mut engine = test_engine();

        engine
            .submit_order(order("s1", Side::SELL, 51000, "1.0", 1))
            .unwrap();
        let result = engine
            .submit_order(order("b1", Side::BUY, 50000, "1.0", 2))
            .unwrap();

        assert!(matches!(result, SubmitResult::Resting { .. }));
        assert_eq!(engine.status().bids, 1);
        assert_eq!(engine.status().asks, 1);
    }

    #[test]
    fn test_engine_sweeps_multiple_levels() {
        let mut engine = test_engine();

        engine
            .submit_order(order("s1", Side::SELL, 50000, "1.0", 1))
            .unwrap();
        engine
            .submit_order(order("s2", Side::SELL, 50100, "1.0", 2))
            .unwrap();
        engine
            .submit_order(order("s3", Side::SELL, 50200, "1.0", 3))
            .unwrap();

        let result = engine
            .submit_order(order("b1", Side::BUY, 50100, "3.0", 4))
            .unwrap();

        // Crosses 50000 and 50100, stops before 50200
        match result {
            SubmitResult::PartiallyFilled { trades, resting } => {
                assert_eq!(trades.len(), 2);
                assert_eq!(trades[0].price, Price::from_u64(50000));
                assert_eq!(trades[1].price, Price::from_u64(50100));
                assert_eq!(resting.remaining_quantity, Quantity::from_str("1.0").unwrap());
            }
            other => panic!("Expected PartiallyFilled, got {other:?}"),
        }

        assert_eq!(engine.status().asks, 1);
        assert_eq!(engine.status().total_matches, 2);
    }

    #[test]
    fn test_engine_fifo_within_level() {
        let mut engine = test_engine();

        engine
            .submit_order(order("s1", Side::SELL, 50000, "1.0", 1))
            .unwrap();
        engine
            .submit_order(order("s2", Side::SELL, 50000, "1.0", 2))
            .unwrap();

        let result = engine
            .submit_order(order("b1", Side::BUY, 50000, "1.0", 3))
            .unwrap();

        match result {
            SubmitResult::Filled { trades } => {
                assert_eq!(trades.len(), 1);
                assert_eq!(trades[0].maker_order_id, OrderId::new("s1"));
            }
            other => panic!("Expected Filled, got {other:?}"),
        }

        // s2 is still resting
        assert_eq!(engine.status().asks, 1);
    }

    #[test]
    fn test_engine_duplicate_order_id_rejected() {
        let mut engine = test_engine();

        engine
            .submit_order(order("b1", Side::BUY, 50000, "1.0", 1))
            .unwrap();
        let err = engine
            .submit_order(order("b1", Side::BUY, 49000, "2.0", 2))
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Order(OrderError::DuplicateOrderId { .. })
        ));
        // The failed submission left no trace
        assert_eq!(engine.status().bids, 1);
    }

    #[test]
    fn test_engine_duplicate_id_allowed_after_maker_consumed() {
        let mut engine = test_engine();

        engine
            .submit_order(order("b1", Side::BUY, 50000, "1.0", 1))
            .unwrap();
        engine
            .submit_order(order("s1", Side::SELL, 50000, "1.0", 2))
            .unwrap();

        // b1 is gone from the book, the identifier may be reused
        let result = engine
            .submit_order(order("b1", Side::BUY, 49000, "1.0", 3))
            .unwrap();
        assert!(matches!(result, SubmitResult::Resting { .. }));
    }

    #[test]
    fn test_engine_cancel_is_idempotent() {
        let mut engine = test_engine();

        engine
            .submit_order(order("b1", Side::BUY, 50000, "1.0", 1))
            .unwrap();

        assert!(engine.cancel_order(&OrderId::new("b1")));
        assert!(!engine.cancel_order(&OrderId::new("b1")));
        assert!(!engine.cancel_order(&OrderId::new("never-existed")));
        assert_eq!(engine.status().bids, 0);
    }

    #[test]
    fn test_engine_canceled_order_never_matches() {
        let mut engine = test_engine();

        engine
            .submit_order(order("s1", Side::SELL, 50000, "1.0", 1))
            .unwrap();
        engine.cancel_order(&OrderId::new("s1"));

        let result = engine
            .submit_order(order("b1", Side::BUY, 50000, "1.0", 2))
            .unwrap();
        assert!(matches!(result, SubmitResult::Resting { .. }));
        assert_eq!(engine.status().total_matches, 0);
    }

    #[test]
    fn test_engine_capacity_rejects_remainder_fills_stand() {
        let mut engine = MatchingEngine::new(
            MarketId::new("BTC/USDT"),
            EngineConfig {
                max_book_depth: 1,
                ..EngineConfig::default()
            },
            RecordingSink::new(),
        );

        engine
            .submit_order(order("b1", Side::BUY, 50000, "1.0", 1))
            .unwrap();

        // Occupy the single ask slot
        engine
            .submit_order(order("s1", Side::SELL, 60000, "1.0", 2))
            .unwrap();

        // Crosses b1 for 1.0, remainder 1.0 cannot rest on the full ask side
        let result = engine
            .submit_order(order("s2", Side::SELL, 50000, "2.0", 3))
            .unwrap();

        match result {
            SubmitResult::RemainderRejected { trades, rejected } => {
                assert_eq!(trades.len(), 1);
                assert_eq!(trades[0].quantity, Quantity::from_str("1.0").unwrap());
                assert_eq!(
                    rejected.status,
                    types::order::OrderStatus::Rejected(RejectReason::BookCapacity)
                );
                assert_eq!(rejected.remaining_quantity, Quantity::from_str("1.0").unwrap());
            }
            other => panic!("Expected RemainderRejected, got {other:?}"),
        }

        // The fill stands
        assert_eq!(engine.status().total_matches, 1);
        assert_eq!(engine.status().bids, 0);
        assert_eq!(engine.status().asks, 1);
    }

    #[test]
    fn test_engine_event_ordering() {
        let mut engine = test_engine();

        engine
            .submit_order(order("s1", Side::SELL, 50000, "0.5", 1))
            .unwrap();
        engine.sink_mut().drain();

        engine
            .submit_order(order("b1", Side::BUY, 50000, "1.0", 2))
            .unwrap();

        let events = engine.sink_mut().drain();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], EngineEvent::OrderSubmitted { .. }));
        assert!(matches!(events[1], EngineEvent::TradeExecuted { .. }));
        assert!(matches!(events[2], EngineEvent::OrderRested { .. }));
    }

    #[test]
    fn test_engine_depth_snapshot() {
        let mut engine = test_engine();

        engine
            .submit_order(order("b1", Side::BUY, 50000, "1.0", 1))
            .unwrap();
        engine
            .submit_order(order("b2", Side::BUY, 49000, "2.0", 2))
            .unwrap();
        engine
            .submit_order(order("s1", Side::SELL, 51000, "1.5", 3))
            .unwrap();

        let snapshot = engine.depth(10);
        assert_eq!(snapshot.bids.len(), 2);
        assert_eq!(snapshot.bids[0].0, Price::from_u64(50000));
        assert_eq!(snapshot.asks.len(), 1);
        assert_eq!(snapshot.asks[0].0, Price::from_u64(51000));

        assert_eq!(
            engine.top_of_book(),
            (Some(Price::from_u64(50000)), Some(Price::from_u64(51000)))
        );
    }

    #[test]
    fn test_engine_sequence_continues_across_submissions() {
        let mut engine = MatchingEngine::new(
            MarketId::new("BTC/USDT"),
            EngineConfig {
                starting_sequence: 100,
                ..EngineConfig::default()
            },
            RecordingSink::new(),
        );

        engine
            .submit_order(order("s1", Side::SELL, 50000, "1.0", 1))
            .unwrap();
        engine
            .submit_order(order("s2", Side::SELL, 50000, "1.0", 2))
            .unwrap();

        let r1 = engine
            .submit_order(order("b1", Side::BUY, 50000, "1.0", 3))
            .unwrap();
        let r2 = engine
            .submit_order(order("b2", Side::BUY, 50000, "1.0", 4))
            .unwrap();

        let seq = |r: &SubmitResult| match r {
            SubmitResult::Filled { trades } => trades[0].sequence,
            other => panic!("Expected Filled, got {other:?}"),
        };
        assert_eq!(seq(&r1), 100);
        assert_eq!(seq(&r2), 101);
    }
}
