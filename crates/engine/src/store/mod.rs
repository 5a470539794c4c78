//! Storage gateway contract.
//!
//! The engine never owns persistence. It talks to a [`Gateway`] exposing one
//! [`Table`] per record type, each supporting insert / query / update /
//! remove. Adapters for a real database live outside this crate; the
//! [`memory`] adapter backs tests and the demo driver.
//!
//! Only two filters are ever needed by the engine: equality on the record
//! id and equality on a cart line's product reference.

pub mod memory;

use std::cmp::Ordering;

use async_trait::async_trait;
use thiserror::Error;

use cartwheel_core::{CartLine, CartLineDraft, CartLineId, Product, ProductId};

pub use memory::MemoryGateway;

/// Failure inside the storage layer itself.
///
/// "No match" is never an error; an empty result set is returned instead.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend could not complete the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A record addressed by `update` or `remove` does not exist.
    #[error("{kind} record {key} is not stored")]
    MissingRecord {
        /// Record type name.
        kind: &'static str,
        /// Storage key of the record.
        key: String,
    },

    /// An insert collided with an existing storage key.
    #[error("{kind} record {key} already stored")]
    DuplicateKey {
        /// Record type name.
        kind: &'static str,
        /// Storage key of the record.
        key: String,
    },
}

/// Equality filters understood by every gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Match on the record's own key.
    Id(String),
    /// Match cart lines referencing the given product.
    ProductId(ProductId),
}

/// A record type the gateway can persist.
pub trait Record: Clone + Send + Sync + 'static {
    /// Fields supplied by the caller on insert.
    type Draft: Send + 'static;

    /// Record type name used in logs and errors.
    const KIND: &'static str;

    /// Materialize a draft, assigning identity where the record has none.
    fn from_draft(draft: Self::Draft) -> Self;

    /// Storage key of the record.
    fn key(&self) -> &str;

    /// Whether the record satisfies a filter.
    fn matches(&self, filter: &Filter) -> bool;
}

impl Record for Product {
    type Draft = Self;

    const KIND: &'static str = "product";

    fn from_draft(draft: Self) -> Self {
        draft
    }

    fn key(&self) -> &str {
        self.id.as_str()
    }

    fn matches(&self, filter: &Filter) -> bool {
        match filter {
            Filter::Id(id) => self.id.as_str() == id,
            Filter::ProductId(product_id) => &self.id == product_id,
        }
    }
}

impl Record for CartLine {
    type Draft = CartLineDraft;

    const KIND: &'static str = "cart_line";

    fn from_draft(draft: CartLineDraft) -> Self {
        Self::with_id(CartLineId::generate(), draft)
    }

    fn key(&self) -> &str {
        self.id.as_str()
    }

    fn matches(&self, filter: &Filter) -> bool {
        match filter {
            Filter::Id(id) => self.id.as_str() == id,
            Filter::ProductId(product_id) => &self.product_id == product_id,
        }
    }
}

/// A query over one table: optional filter and optional ordering.
///
/// Without an ordering, results come back in storage-iteration order.
pub struct Query<R> {
    pub filter: Option<Filter>,
    pub order_by: Option<fn(&R, &R) -> Ordering>,
}

impl<R> Query<R> {
    /// Every record in the table.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            filter: None,
            order_by: None,
        }
    }

    /// Records matching `filter`.
    #[must_use]
    pub const fn filtered(filter: Filter) -> Self {
        Self {
            filter: Some(filter),
            order_by: None,
        }
    }

    /// Order results with a comparator.
    #[must_use]
    pub const fn order_by(mut self, compare: fn(&R, &R) -> Ordering) -> Self {
        self.order_by = Some(compare);
        self
    }
}

impl<R> Clone for Query<R> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            order_by: self.order_by,
        }
    }
}

impl<R> std::fmt::Debug for Query<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("filter", &self.filter)
            .field("ordered", &self.order_by.is_some())
            .finish()
    }
}

/// CRUD access to one record type.
#[async_trait]
pub trait Table<R: Record>: Send + Sync {
    /// Create and persist one record from a draft.
    async fn insert(&self, draft: R::Draft) -> Result<R, GatewayError>;

    /// Fetch matching records. An empty result is not an error.
    async fn query(&self, query: Query<R>) -> Result<Vec<R>, GatewayError>;

    /// Persist an in-place mutation of an existing record.
    async fn update(&self, record: R) -> Result<(), GatewayError>;

    /// Delete and persist.
    async fn remove(&self, record: &R) -> Result<(), GatewayError>;

    /// First record matching `filter`, if any.
    async fn find_one(&self, filter: Filter) -> Result<Option<R>, GatewayError> {
        Ok(self.query(Query::filtered(filter)).await?.into_iter().next())
    }
}

/// The tables the engine reads and writes.
pub trait Gateway: Send + Sync {
    /// Catalog products.
    fn products(&self) -> &dyn Table<Product>;

    /// Cart lines.
    fn cart_lines(&self) -> &dyn Table<CartLine>;
}
