//! Error types for the matching engine
//!
//! All engine error signaling is via return values; the matching path
//! never panics on caller input. Capacity refusals are not errors,
//! they are reported through the submission result.

use thiserror::Error;

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Order error: {0}")]
    Order(#[from] OrderError),
}

/// Order-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Duplicate order id: {order_id} is already resting")]
    DuplicateOrderId { order_id: String },
}
