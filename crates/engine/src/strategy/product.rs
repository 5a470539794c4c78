//! Product operation strategies.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use cartwheel_core::{Product, ProductId};

use crate::error::{OperationError, Result};
use crate::image::{CompressJpeg, DEFAULT_IMAGE_QUALITY, ImageEncoder};
use crate::store::{Filter, Gateway, GatewayError, Query};

/// What a product operation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductOutcome {
    /// A mutation was persisted.
    Applied,
    /// The catalog in storage order.
    Products(Vec<Product>),
}

impl ProductOutcome {
    /// The products, if this outcome carries them.
    #[must_use]
    pub fn into_products(self) -> Option<Vec<Product>> {
        match self {
            Self::Products(products) => Some(products),
            Self::Applied => None,
        }
    }
}

/// A unit of catalog work.
#[async_trait]
pub trait ProductOperation: Send + Sync {
    /// Run the operation.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError`] on missing or conflicting records, image
    /// encoding failures, or gateway faults.
    async fn execute(&self) -> Result<ProductOutcome>;
}

/// Input for creating a product.
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    /// Caller-chosen id; a fresh one is generated when absent.
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
    /// Raw image bytes as picked by the UI.
    pub image: Option<Vec<u8>>,
}

impl NewProduct {
    #[must_use]
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            image: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.image = Some(image);
        self
    }
}

/// Create a product, refusing duplicate ids.
pub struct AddProduct {
    gateway: Arc<dyn Gateway>,
    id: ProductId,
    name: String,
    price: f64,
    image: Option<Vec<u8>>,
    encoder: Arc<dyn ImageEncoder>,
    quality: f32,
}

impl AddProduct {
    /// Bind a new product. The id is fixed here, generated if not supplied.
    ///
    /// Images are compressed with [`CompressJpeg`] at the default quality
    /// unless [`AddProduct::with_encoder`] says otherwise.
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, product: NewProduct) -> Self {
        Self {
            gateway,
            id: product.id.unwrap_or_else(ProductId::generate),
            name: product.name,
            price: product.price,
            image: product.image,
            encoder: Arc::new(CompressJpeg),
            quality: DEFAULT_IMAGE_QUALITY,
        }
    }

    /// Use a specific image encoder and quality.
    #[must_use]
    pub fn with_encoder(mut self, encoder: Arc<dyn ImageEncoder>, quality: f32) -> Self {
        self.encoder = encoder;
        self.quality = quality;
        self
    }

    /// The id the product will be stored under.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }
}

#[async_trait]
impl ProductOperation for AddProduct {
    async fn execute(&self) -> Result<ProductOutcome> {
        let products = self.gateway.products();
        if products
            .find_one(Filter::Id(self.id.to_string()))
            .await?
            .is_some()
        {
            return Err(OperationError::Conflict(format!(
                "product {} already exists",
                self.id
            )));
        }

        let mut product = Product::new(self.id.clone(), self.name.clone(), self.price);
        if let Some(raw) = &self.image {
            product = product.with_image(self.encoder.encode(raw, self.quality)?);
        }

        products.insert(product).await.map_err(|e| match e {
            GatewayError::DuplicateKey { .. } => {
                OperationError::Conflict(format!("product {} already exists", self.id))
            }
            other => OperationError::Gateway(other),
        })?;

        info!(product_id = %self.id, name = %self.name, "Added product");
        Ok(ProductOutcome::Applied)
    }
}

/// Delete a product by id.
///
/// By default the cart line referencing the product is left in place and
/// simply stops appearing in cart views. With [`DeleteProduct::cascade`] the
/// line is deleted as well.
pub struct DeleteProduct {
    gateway: Arc<dyn Gateway>,
    id: ProductId,
    cascade: bool,
}

impl DeleteProduct {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, id: ProductId) -> Self {
        Self {
            gateway,
            id,
            cascade: false,
        }
    }

    /// Also delete the cart line referencing the product.
    #[must_use]
    pub const fn cascade(mut self, cascade: bool) -> Self {
        self.cascade = cascade;
        self
    }
}

#[async_trait]
impl ProductOperation for DeleteProduct {
    async fn execute(&self) -> Result<ProductOutcome> {
        let products = self.gateway.products();
        let product = products
            .find_one(Filter::Id(self.id.to_string()))
            .await?
            .ok_or_else(|| OperationError::NotFound(format!("product {}", self.id)))?;

        // Product goes first: if the line removal below fails, the leftover
        // line is an orphan, which views already tolerate.
        products.remove(&product).await?;
        info!(product_id = %self.id, name = %product.name, "Deleted product");

        if self.cascade {
            let lines = self.gateway.cart_lines();
            if let Some(line) = lines.find_one(Filter::ProductId(self.id.clone())).await? {
                lines.remove(&line).await?;
                info!(product_id = %self.id, "Deleted cart line with product");
            }
        }

        Ok(ProductOutcome::Applied)
    }
}

/// Read the whole catalog.
pub struct FetchProducts {
    gateway: Arc<dyn Gateway>,
}

impl FetchProducts {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ProductOperation for FetchProducts {
    async fn execute(&self) -> Result<ProductOutcome> {
        let products = self.gateway.products().query(Query::all()).await?;
        if products.is_empty() {
            debug!("No products found");
        }
        Ok(ProductOutcome::Products(products))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_possible_truncation)]
mod tests {
    use cartwheel_core::{CartLineDraft, ImageData};

    use super::*;
    use crate::image::ImageError;
    use crate::store::MemoryGateway;

    struct Halving;

    impl ImageEncoder for Halving {
        fn encode(&self, raw: &[u8], _quality: f32) -> std::result::Result<ImageData, ImageError> {
            Ok(ImageData::new(raw.iter().step_by(2).copied().collect()))
        }
    }

    #[tokio::test]
    async fn test_add_product_with_explicit_id() {
        let gateway = Arc::new(MemoryGateway::new());
        let op = AddProduct::new(
            gateway.clone(),
            NewProduct::new("Widget", 9.99).with_id(ProductId::new("p1")),
        );
        assert_eq!(op.id(), &ProductId::new("p1"));
        assert_eq!(op.execute().await.unwrap(), ProductOutcome::Applied);

        let stored = gateway
            .products()
            .find_one(Filter::Id("p1".to_owned()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.name, "Widget");
        assert!(stored.image.is_none());
    }

    #[tokio::test]
    async fn test_add_product_generates_id() {
        let gateway = Arc::new(MemoryGateway::new());
        let op = AddProduct::new(gateway.clone(), NewProduct::new("Widget", 1.0));
        let id = op.id().clone();
        op.execute().await.unwrap();
        assert!(!id.as_str().is_empty());
        assert_eq!(gateway.product_table().len(), 1);
    }

    #[tokio::test]
    async fn test_add_product_duplicate_is_conflict() {
        let gateway = Arc::new(MemoryGateway::new());
        let product = NewProduct::new("Widget", 9.99).with_id(ProductId::new("p1"));
        AddProduct::new(gateway.clone(), product.clone())
            .execute()
            .await
            .unwrap();

        let err = AddProduct::new(gateway.clone(), product)
            .execute()
            .await
            .unwrap_err();
        assert!(matches!(err, OperationError::Conflict(_)));
        assert_eq!(gateway.product_table().len(), 1);
    }

    #[tokio::test]
    async fn test_add_product_encodes_image() {
        let gateway = Arc::new(MemoryGateway::new());
        AddProduct::new(
            gateway.clone(),
            NewProduct::new("Widget", 9.99)
                .with_id(ProductId::new("p1"))
                .with_image(vec![1, 2, 3, 4]),
        )
        .with_encoder(Arc::new(Halving), 0.8)
        .execute()
        .await
        .unwrap();

        let stored = gateway
            .products()
            .find_one(Filter::Id("p1".to_owned()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.image.unwrap().as_bytes(), &[1, 3]);
    }

    #[tokio::test]
    async fn test_add_product_rejects_empty_image() {
        let gateway = Arc::new(MemoryGateway::new());
        let err = AddProduct::new(gateway.clone(), NewProduct::new("Widget", 1.0).with_image(vec![]))
            .execute()
            .await
            .unwrap_err();
        assert!(matches!(err, OperationError::Image(ImageError::Empty)));
        assert!(gateway.product_table().is_empty());
    }

    #[tokio::test]
    async fn test_add_product_rejects_non_image_bytes() {
        let gateway = Arc::new(MemoryGateway::new());
        let err = AddProduct::new(
            gateway.clone(),
            NewProduct::new("Widget", 1.0).with_image(vec![0xAB; 4096]),
        )
        .execute()
        .await
        .unwrap_err();
        assert!(matches!(err, OperationError::Image(ImageError::Encoding(_))));
        assert!(gateway.product_table().is_empty());
    }

    #[tokio::test]
    async fn test_add_product_quality_changes_stored_image() {
        let img = image::RgbImage::from_fn(64, 64, |x, y| {
            let v = ((x * 37) ^ (y * 91)).wrapping_mul(2_654_435_761) >> 24;
            image::Rgb([v as u8, (v >> 1) as u8, (255 - v) as u8])
        });
        let mut raw = std::io::Cursor::new(Vec::new());
        img.write_to(&mut raw, image::ImageFormat::Png).unwrap();
        let raw = raw.into_inner();

        let gateway = Arc::new(MemoryGateway::new());
        for (id, quality) in [("hi", 1.0), ("lo", 0.05)] {
            AddProduct::new(
                gateway.clone(),
                NewProduct::new(id, 1.0)
                    .with_id(ProductId::new(id))
                    .with_image(raw.clone()),
            )
            .with_encoder(Arc::new(CompressJpeg), quality)
            .execute()
            .await
            .unwrap();
        }

        let stored = |id: &'static str| {
            let gateway = gateway.clone();
            async move {
                gateway
                    .products()
                    .find_one(Filter::Id(id.to_owned()))
                    .await
                    .unwrap()
                    .unwrap()
                    .image
                    .unwrap()
            }
        };
        let hi = stored("hi").await;
        let lo = stored("lo").await;
        assert_ne!(hi.as_bytes(), raw.as_slice());
        assert!(lo.len() < hi.len());
    }

    #[tokio::test]
    async fn test_delete_product() {
        let gateway = Arc::new(MemoryGateway::new());
        AddProduct::new(
            gateway.clone(),
            NewProduct::new("Widget", 9.99).with_id(ProductId::new("p1")),
        )
        .execute()
        .await
        .unwrap();

        DeleteProduct::new(gateway.clone(), ProductId::new("p1"))
            .execute()
            .await
            .unwrap();
        assert!(gateway.product_table().is_empty());

        let err = DeleteProduct::new(gateway.clone(), ProductId::new("p1"))
            .execute()
            .await
            .unwrap_err();
        assert!(matches!(err, OperationError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_product_cascade_removes_cart_line() {
        let gateway = Arc::new(MemoryGateway::new());
        for id in ["p1", "p2"] {
            AddProduct::new(gateway.clone(), NewProduct::new(id, 1.0).with_id(ProductId::new(id)))
                .execute()
                .await
                .unwrap();
            gateway
                .cart_lines()
                .insert(CartLineDraft {
                    product_id: ProductId::new(id),
                    quantity: 1,
                    shipping: String::new(),
                    payment: String::new(),
                })
                .await
                .unwrap();
        }

        DeleteProduct::new(gateway.clone(), ProductId::new("p1"))
            .execute()
            .await
            .unwrap();
        assert_eq!(gateway.cart_line_table().len(), 2);

        DeleteProduct::new(gateway.clone(), ProductId::new("p2"))
            .cascade(true)
            .execute()
            .await
            .unwrap();
        let remaining = gateway.cart_lines().query(Query::all()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].product_id, ProductId::new("p1"));
    }

    #[tokio::test]
    async fn test_fetch_products_empty_is_ok() {
        let gateway = Arc::new(MemoryGateway::new());
        let outcome = FetchProducts::new(gateway).execute().await.unwrap();
        assert_eq!(outcome.into_products(), Some(Vec::new()));
    }
}
