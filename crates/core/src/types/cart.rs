//! Cart line records and their display join.

use serde::{Deserialize, Serialize};

use super::id::{CartLineId, ProductId};
use super::product::Product;

/// A persisted cart line.
///
/// `product_id` is a non-owning reference: the product may be deleted while
/// the line still exists. At most one line per product is kept; repeated
/// additions bump `quantity` instead of inserting a new line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Storage-assigned record identity.
    pub id: CartLineId,
    pub product_id: ProductId,
    /// Always at least 1.
    pub quantity: u32,
    /// Label of the shipping method chosen when the line was created.
    pub shipping: String,
    /// Label of the payment method chosen when the line was created.
    pub payment: String,
}

/// Fields of a cart line before the storage layer assigns its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineDraft {
    pub product_id: ProductId,
    pub quantity: u32,
    pub shipping: String,
    pub payment: String,
}

impl CartLine {
    /// Materialize a draft under the given identity.
    #[must_use]
    pub fn with_id(id: CartLineId, draft: CartLineDraft) -> Self {
        Self {
            id,
            product_id: draft.product_id,
            quantity: draft.quantity,
            shipping: draft.shipping,
            payment: draft.payment,
        }
    }
}

/// Display-ready join of a cart line and the product it references.
///
/// Never persisted; rebuilt on every cart fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineView {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub product_id: ProductId,
    pub shipping: String,
    pub payment: String,
}

impl CartLineView {
    /// Join a line with its product.
    ///
    /// The caller is responsible for passing the product the line points at.
    #[must_use]
    pub fn join(line: &CartLine, product: &Product) -> Self {
        debug_assert_eq!(line.product_id, product.id);
        Self {
            name: product.name.clone(),
            price: product.price,
            quantity: line.quantity,
            product_id: line.product_id.clone(),
            shipping: line.shipping.clone(),
            payment: line.payment.clone(),
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_copies_product_and_line_fields() {
        let product = Product::new(ProductId::new("p1"), "Widget", 9.99);
        let line = CartLine::with_id(
            CartLineId::new("line-1"),
            CartLineDraft {
                product_id: ProductId::new("p1"),
                quantity: 2,
                shipping: "Standard".to_owned(),
                payment: "CreditCard".to_owned(),
            },
        );

        let view = CartLineView::join(&line, &product);
        assert_eq!(view.name, "Widget");
        assert_eq!(view.quantity, 2);
        assert_eq!(view.product_id, ProductId::new("p1"));
        assert_eq!(view.shipping, "Standard");
        assert_eq!(view.payment, "CreditCard");
        assert!((view.subtotal() - 19.98).abs() < 1e-9);
    }
}
