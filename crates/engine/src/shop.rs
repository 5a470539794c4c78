//! Shop facade.
//!
//! Wires a gateway, the notification hub, the session preferences and the
//! engine configuration together, and runs every operation through its
//! strategy context. This is the surface a UI or the CLI talks to.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use cartwheel_core::{CartLineView, Product, ProductId};

use crate::checkout::{self, OrderSummary};
use crate::config::EngineConfig;
use crate::context::{CartContext, PaymentContext, ProductContext, ShippingContext, SortContext};
use crate::error::{OperationError, Result};
use crate::image::{CompressJpeg, ImageEncoder};
use crate::notify::{CatalogSnapshot, DiscountEvent, NotificationHub};
use crate::session::SessionPreferences;
use crate::store::{Filter, Gateway};
use crate::strategy::{
    AddProduct, AddToCart, ClearCart, CreditCardPayment, DeleteProduct, FetchCartItems,
    FetchProducts, NewProduct, PurgeOrphanedLines, RemoveFromCart, StandardShipping,
};

/// Application-facing entry point.
#[derive(Clone)]
pub struct Shop {
    gateway: Arc<dyn Gateway>,
    hub: NotificationHub,
    session: Arc<SessionPreferences>,
    config: EngineConfig,
    encoder: Arc<dyn ImageEncoder>,
}

impl Shop {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn Gateway>,
        hub: NotificationHub,
        session: Arc<SessionPreferences>,
        config: EngineConfig,
    ) -> Self {
        Self {
            gateway,
            hub,
            session,
            config,
            encoder: Arc::new(CompressJpeg),
        }
    }

    /// Replace the image encoder used by [`Shop::add_product`]
    /// ([`CompressJpeg`] by default).
    #[must_use]
    pub fn with_encoder(mut self, encoder: Arc<dyn ImageEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    #[must_use]
    pub const fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    #[must_use]
    pub const fn session(&self) -> &Arc<SessionPreferences> {
        &self.session
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::clone(&self.gateway)
    }

    /// Create a product and broadcast the updated catalog.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` for a duplicate id, `Image` for an unusable image,
    /// or `Gateway` on storage failure.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn add_product(&self, product: NewProduct) -> Result<ProductId> {
        let op = AddProduct::new(self.gateway(), product)
            .with_encoder(Arc::clone(&self.encoder), self.config.image_quality);
        let id = op.id().clone();
        ProductContext::new(op).execute().await?;
        self.publish_catalog().await;
        Ok(id)
    }

    /// Delete a product and broadcast the updated catalog.
    ///
    /// The referencing cart line is deleted too when `cascade_delete` is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist, or `Gateway` on
    /// storage failure.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        let op = DeleteProduct::new(self.gateway(), id.clone()).cascade(self.config.cascade_delete);
        ProductContext::new(op).execute().await?;
        self.publish_catalog().await;
        Ok(())
    }

    /// The catalog ordered by `sort`.
    ///
    /// # Errors
    ///
    /// Returns `Gateway` on storage failure.
    pub async fn products(&self, sort: &SortContext) -> Result<Vec<Product>> {
        Ok(sort.sort(self.fetch_products().await?))
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist, or `Gateway` on
    /// storage failure.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        product_id: &ProductId,
        shipping: &str,
        payment: &str,
    ) -> Result<()> {
        CartContext::new(AddToCart::new(
            self.gateway(),
            product_id.clone(),
            shipping,
            payment,
        ))
        .execute()
        .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotFound` if no cart line references the product, or
    /// `Gateway` on storage failure.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_cart(&self, product_id: &ProductId) -> Result<()> {
        CartContext::new(RemoveFromCart::new(self.gateway(), product_id.clone()))
            .execute()
            .await?;
        Ok(())
    }

    /// The cart as display rows.
    ///
    /// # Errors
    ///
    /// Returns `Gateway` on storage failure.
    pub async fn cart(&self) -> Result<Vec<CartLineView>> {
        let outcome = CartContext::new(FetchCartItems::new(self.gateway()))
            .execute()
            .await?;
        Ok(outcome.into_items().unwrap_or_default())
    }

    /// Delete cart lines left behind by deleted products.
    ///
    /// Returns the number of lines removed.
    ///
    /// # Errors
    ///
    /// Returns `Gateway` on storage failure.
    #[instrument(skip(self))]
    pub async fn reconcile_cart(&self) -> Result<usize> {
        let outcome = CartContext::new(PurgeOrphanedLines::new(self.gateway()))
            .execute()
            .await?;
        Ok(outcome.removed().unwrap_or_default())
    }

    /// Broadcast a flat discount on a product. Admin sessions only.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin sessions, `NotFound` if the
    /// product does not exist, or `Gateway` on storage failure.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn announce_discount(
        &self,
        product_id: &ProductId,
        amount: f64,
    ) -> Result<DiscountEvent> {
        if !self.session.is_admin() {
            return Err(OperationError::Unauthorized(
                "announcing discounts requires an admin session".to_string(),
            ));
        }

        let product = self
            .gateway
            .products()
            .find_one(Filter::Id(product_id.to_string()))
            .await?
            .ok_or_else(|| OperationError::NotFound(format!("product {product_id}")))?;

        let event = DiscountEvent {
            product_id: product.id.clone(),
            amount,
            discounted_price: product.discounted_price(amount),
        };
        let delivered = self.hub.discounts().publish(&event);
        info!(amount, delivered, "Announced discount");
        Ok(event)
    }

    /// Price the cart, then empty it.
    ///
    /// Lines recorded without a recognizable method fall back to standard
    /// shipping and credit card payment.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` if there is nothing to order, or `Gateway` on
    /// storage failure.
    #[instrument(skip(self))]
    pub async fn place_order(&self) -> Result<OrderSummary> {
        let items = self.cart().await?;
        let mut shipping = ShippingContext::new(StandardShipping);
        let mut payment = PaymentContext::new(CreditCardPayment);
        let summary = checkout::summarize(
            &items,
            self.config.checkout_distance,
            &mut shipping,
            &mut payment,
        )?;

        CartContext::new(ClearCart::new(self.gateway()))
            .execute()
            .await?;
        info!(
            lines = summary.lines.len(),
            total = summary.total,
            "Placed order"
        );
        Ok(summary)
    }

    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let outcome = ProductContext::new(FetchProducts::new(self.gateway()))
            .execute()
            .await?;
        Ok(outcome.into_products().unwrap_or_default())
    }

    /// The mutation has already been persisted, so a failed refresh is
    /// logged rather than reported to the caller.
    async fn publish_catalog(&self) {
        match self.fetch_products().await {
            Ok(products) => {
                self.hub.catalog().publish(&CatalogSnapshot { products });
            }
            Err(e) => warn!(error = %e, "Failed to refresh catalog for subscribers"),
        }
    }
}
