//! Catalog product record.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::image::ImageData;

/// A catalog product.
///
/// Products are immutable once stored: there is no update path, only
/// creation and deletion. `price` is in currency units and is expected, but
/// not required, to be non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,
}

impl Product {
    /// Create a product without an image.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
        }
    }

    /// Attach encoded image bytes.
    #[must_use]
    pub fn with_image(mut self, image: ImageData) -> Self {
        self.image = Some(image);
        self
    }

    /// Price after subtracting a flat discount, floored at zero.
    #[must_use]
    pub fn discounted_price(&self, discount: f64) -> f64 {
        (self.price - discount).max(0.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_discounted_price() {
        let product = Product::new(ProductId::new("p1"), "Widget", 25.0);
        assert!((product.discounted_price(10.0) - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_discount_never_goes_negative() {
        let product = Product::new(ProductId::new("p1"), "Widget", 5.0);
        assert!(product.discounted_price(10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_image_omitted_when_absent() {
        let product = Product::new(ProductId::new("p1"), "Widget", 9.99);
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("image").is_none());
        assert_eq!(json["id"], "p1");
    }
}
