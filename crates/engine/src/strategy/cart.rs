//! Cart operation strategies.
//!
//! Each strategy binds its parameters at construction and performs exactly
//! one unit of work against the gateway when executed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use cartwheel_core::{CartLineDraft, CartLineView, ProductId};

use crate::error::{OperationError, Result};
use crate::store::{Filter, Gateway, Query};
use crate::view;

/// What a cart operation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CartOutcome {
    /// A mutation was persisted.
    Applied,
    /// The current cart as display rows.
    Items(Vec<CartLineView>),
    /// Number of lines deleted by a bulk operation.
    Removed(usize),
}

impl CartOutcome {
    /// The display rows, if this outcome carries them.
    #[must_use]
    pub fn into_items(self) -> Option<Vec<CartLineView>> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }

    /// The removal count, if this outcome carries one.
    #[must_use]
    pub const fn removed(&self) -> Option<usize> {
        match self {
            Self::Removed(count) => Some(*count),
            _ => None,
        }
    }
}

/// A unit of cart work.
#[async_trait]
pub trait CartOperation: Send + Sync {
    /// Run the operation.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError`] when a referenced record is missing or the
    /// gateway fails.
    async fn execute(&self) -> Result<CartOutcome>;
}

/// Put one unit of a product in the cart.
///
/// Adds a new line with quantity 1, or bumps the quantity of the line that
/// already references the product. Labels only apply to new lines.
pub struct AddToCart {
    gateway: Arc<dyn Gateway>,
    product_id: ProductId,
    shipping: String,
    payment: String,
}

impl AddToCart {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn Gateway>,
        product_id: ProductId,
        shipping: impl Into<String>,
        payment: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            product_id,
            shipping: shipping.into(),
            payment: payment.into(),
        }
    }
}

#[async_trait]
impl CartOperation for AddToCart {
    async fn execute(&self) -> Result<CartOutcome> {
        let product = self
            .gateway
            .products()
            .find_one(Filter::Id(self.product_id.to_string()))
            .await?;
        if product.is_none() {
            return Err(OperationError::NotFound(format!(
                "product {}",
                self.product_id
            )));
        }

        let lines = self.gateway.cart_lines();
        if let Some(mut line) = lines
            .find_one(Filter::ProductId(self.product_id.clone()))
            .await?
        {
            line.quantity = line.quantity.saturating_add(1);
            let quantity = line.quantity;
            lines.update(line).await?;
            info!(product_id = %self.product_id, quantity, "Incremented cart line");
        } else {
            lines
                .insert(CartLineDraft {
                    product_id: self.product_id.clone(),
                    quantity: 1,
                    shipping: self.shipping.clone(),
                    payment: self.payment.clone(),
                })
                .await?;
            info!(product_id = %self.product_id, "Added cart line");
        }

        Ok(CartOutcome::Applied)
    }
}

/// Delete the cart line referencing a product.
pub struct RemoveFromCart {
    gateway: Arc<dyn Gateway>,
    product_id: ProductId,
}

impl RemoveFromCart {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, product_id: ProductId) -> Self {
        Self {
            gateway,
            product_id,
        }
    }
}

#[async_trait]
impl CartOperation for RemoveFromCart {
    async fn execute(&self) -> Result<CartOutcome> {
        let lines = self.gateway.cart_lines();
        let line = lines
            .find_one(Filter::ProductId(self.product_id.clone()))
            .await?
            .ok_or_else(|| {
                OperationError::NotFound(format!("cart line for product {}", self.product_id))
            })?;

        lines.remove(&line).await?;
        info!(product_id = %self.product_id, "Removed cart line");
        Ok(CartOutcome::Applied)
    }
}

/// Read the cart joined with the catalog.
///
/// Lines whose product no longer exists are left out of the result.
pub struct FetchCartItems {
    gateway: Arc<dyn Gateway>,
}

impl FetchCartItems {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl CartOperation for FetchCartItems {
    async fn execute(&self) -> Result<CartOutcome> {
        let lines = self.gateway.cart_lines().query(Query::all()).await?;
        let items = view::build_cart_view(self.gateway.as_ref(), &lines).await?;
        debug!(lines = lines.len(), items = items.len(), "Fetched cart");
        Ok(CartOutcome::Items(items))
    }
}

/// Delete every cart line, as done after an order is placed.
pub struct ClearCart {
    gateway: Arc<dyn Gateway>,
}

impl ClearCart {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl CartOperation for ClearCart {
    async fn execute(&self) -> Result<CartOutcome> {
        let table = self.gateway.cart_lines();
        let lines = table.query(Query::all()).await?;
        for line in &lines {
            table.remove(line).await?;
        }
        info!(removed = lines.len(), "Cleared cart");
        Ok(CartOutcome::Removed(lines.len()))
    }
}

/// Delete cart lines whose product has been removed from the catalog.
///
/// Such lines never show up in [`FetchCartItems`] and cannot be addressed by
/// [`RemoveFromCart`] through the UI, so without this pass they linger in
/// storage indefinitely.
pub struct PurgeOrphanedLines {
    gateway: Arc<dyn Gateway>,
}

impl PurgeOrphanedLines {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl CartOperation for PurgeOrphanedLines {
    async fn execute(&self) -> Result<CartOutcome> {
        let table = self.gateway.cart_lines();
        let lines = table.query(Query::all()).await?;
        let orphans = view::find_orphaned_lines(self.gateway.as_ref(), &lines).await?;
        for line in &orphans {
            table.remove(line).await?;
        }
        if !orphans.is_empty() {
            info!(removed = orphans.len(), "Purged orphaned cart lines");
        }
        Ok(CartOutcome::Removed(orphans.len()))
    }
}
