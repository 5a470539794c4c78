//! Integration tests for Cartwheel.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartwheel-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Catalog and cart operations through the shop facade
//! - `notifications` - Discount and catalog fan-out
//! - `strategies` - Sorting, shipping and payment rules
//! - `gateway_faults` - Storage failures surfacing as operation errors
//!
//! This crate also provides the shared fixtures those tests use.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use cartwheel_core::{CartLine, Product, ProductId};
use cartwheel_engine::notify::NotificationHub;
use cartwheel_engine::session::SessionPreferences;
use cartwheel_engine::store::memory::MemoryTable;
use cartwheel_engine::store::{Gateway, GatewayError, MemoryGateway, Query, Record, Table};
use cartwheel_engine::strategy::NewProduct;
use cartwheel_engine::{EngineConfig, OperationError, Shop};

/// A shop over a fresh in-memory gateway, with handles to its parts.
pub struct TestContext {
    pub gateway: Arc<MemoryGateway>,
    pub session: Arc<SessionPreferences>,
    pub shop: Shop,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let gateway = Arc::new(MemoryGateway::new());
        let session = Arc::new(SessionPreferences::new());
        let shop = Shop::new(
            gateway.clone(),
            NotificationHub::new(),
            Arc::clone(&session),
            config,
        );
        Self {
            gateway,
            session,
            shop,
        }
    }

    /// Add products by `(id, name, price)`.
    ///
    /// # Errors
    ///
    /// Returns the first failing add.
    pub async fn seed(&self, products: &[(&str, &str, f64)]) -> Result<(), OperationError> {
        for (id, name, price) in products {
            self.shop
                .add_product(NewProduct::new(*name, *price).with_id(ProductId::new(*id)))
                .await?;
        }
        Ok(())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A table that fails every call while its switch is on.
pub struct FlakyTable<R> {
    inner: MemoryTable<R>,
    failing: AtomicBool,
}

impl<R: Record> FlakyTable<R> {
    fn check(&self) -> Result<(), GatewayError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(GatewayError::Backend(format!("{} table unavailable", R::KIND)));
        }
        Ok(())
    }
}

#[async_trait]
impl<R: Record> Table<R> for FlakyTable<R> {
    async fn insert(&self, draft: R::Draft) -> Result<R, GatewayError> {
        self.check()?;
        self.inner.insert(draft).await
    }

    async fn query(&self, query: Query<R>) -> Result<Vec<R>, GatewayError> {
        self.check()?;
        self.inner.query(query).await
    }

    async fn update(&self, record: R) -> Result<(), GatewayError> {
        self.check()?;
        self.inner.update(record).await
    }

    async fn remove(&self, record: &R) -> Result<(), GatewayError> {
        self.check()?;
        self.inner.remove(record).await
    }
}

/// Gateway whose tables can be switched into a failing state independently.
pub struct FlakyGateway {
    products: FlakyTable<Product>,
    cart_lines: FlakyTable<CartLine>,
}

impl FlakyGateway {
    #[must_use]
    pub fn new() -> Self {
        Self {
            products: FlakyTable {
                inner: MemoryTable::new(),
                failing: AtomicBool::new(false),
            },
            cart_lines: FlakyTable {
                inner: MemoryTable::new(),
                failing: AtomicBool::new(false),
            },
        }
    }

    pub fn fail_products(&self, failing: bool) {
        self.products.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fail_cart_lines(&self, failing: bool) {
        self.cart_lines.failing.store(failing, Ordering::SeqCst);
    }

    #[must_use]
    pub fn cart_line_count(&self) -> usize {
        self.cart_lines.inner.len()
    }
}

impl Default for FlakyGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway for FlakyGateway {
    fn products(&self) -> &dyn Table<Product> {
        &self.products
    }

    fn cart_lines(&self) -> &dyn Table<CartLine> {
        &self.cart_lines
    }
}
