//! In-process gateway backed by insertion-ordered vectors.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use cartwheel_core::{CartLine, Product};

use super::{Gateway, GatewayError, Query, Record, Table};

/// One in-memory table.
///
/// Records keep their insertion order, which is the storage-iteration order
/// reported by unordered queries.
pub struct MemoryTable<R> {
    rows: RwLock<Vec<R>>,
}

impl<R> Default for MemoryTable<R> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<R: Record> MemoryTable<R> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<R: Record> Table<R> for MemoryTable<R> {
    async fn insert(&self, draft: R::Draft) -> Result<R, GatewayError> {
        let record = R::from_draft(draft);
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        if rows.iter().any(|row| row.key() == record.key()) {
            return Err(GatewayError::DuplicateKey {
                kind: R::KIND,
                key: record.key().to_owned(),
            });
        }
        debug!(kind = R::KIND, key = record.key(), "Inserted record");
        rows.push(record.clone());
        Ok(record)
    }

    async fn query(&self, query: Query<R>) -> Result<Vec<R>, GatewayError> {
        let mut matched: Vec<R> = {
            let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
            rows.iter()
                .filter(|row| query.filter.as_ref().is_none_or(|f| row.matches(f)))
                .cloned()
                .collect()
        };
        if let Some(compare) = query.order_by {
            matched.sort_by(compare);
        }
        Ok(matched)
    }

    async fn update(&self, record: R) -> Result<(), GatewayError> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let slot = rows
            .iter_mut()
            .find(|row| row.key() == record.key())
            .ok_or_else(|| GatewayError::MissingRecord {
                kind: R::KIND,
                key: record.key().to_owned(),
            })?;
        *slot = record;
        Ok(())
    }

    async fn remove(&self, record: &R) -> Result<(), GatewayError> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let position = rows
            .iter()
            .position(|row| row.key() == record.key())
            .ok_or_else(|| GatewayError::MissingRecord {
                kind: R::KIND,
                key: record.key().to_owned(),
            })?;
        rows.remove(position);
        debug!(kind = R::KIND, key = record.key(), "Removed record");
        Ok(())
    }
}

/// Gateway keeping every table in process memory.
#[derive(Default)]
pub struct MemoryGateway {
    products: MemoryTable<Product>,
    cart_lines: MemoryTable<CartLine>,
}

impl MemoryGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access to the product table, for inspection in tests.
    #[must_use]
    pub const fn product_table(&self) -> &MemoryTable<Product> {
        &self.products
    }

    /// Direct access to the cart line table, for inspection in tests.
    #[must_use]
    pub const fn cart_line_table(&self) -> &MemoryTable<CartLine> {
        &self.cart_lines
    }
}

impl Gateway for MemoryGateway {
    fn products(&self) -> &dyn Table<Product> {
        &self.products
    }

    fn cart_lines(&self) -> &dyn Table<CartLine> {
        &self.cart_lines
    }
}
