//! Unified error type for engine operations.
//!
//! Every strategy, context, and facade call returns
//! `Result<T, OperationError>`. Nothing is panicked past an operation
//! boundary; callers decide whether to surface an error to a person.

use thiserror::Error;

use crate::image::ImageError;
use crate::store::GatewayError;

/// Operation-level error type.
#[derive(Debug, Error)]
pub enum OperationError {
    /// A referenced entity has no matching record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A record with the same identity already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The storage layer failed. Not retried.
    #[error("Storage error: {0}")]
    Gateway(#[from] GatewayError),

    /// Image bytes could not be encoded for storage.
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The session lacks the privilege the operation requires.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl OperationError {
    /// Whether the error came from the storage layer rather than from the
    /// request itself.
    #[must_use]
    pub const fn is_gateway_fault(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }
}

/// Result type alias for `OperationError`.
pub type Result<T> = std::result::Result<T, OperationError>;
