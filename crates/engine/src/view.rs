//! Cart view assembly.
//!
//! Joins cart lines with the catalog. A line whose product no longer exists
//! has nothing to display and is left out of the view; those same lines are
//! what [`find_orphaned_lines`] reports.

use std::collections::HashMap;

use tracing::debug;

use cartwheel_core::{CartLine, CartLineView, Product, ProductId};

use crate::error::Result;
use crate::store::{Gateway, Query};

async fn catalog_index(gateway: &dyn Gateway) -> Result<HashMap<ProductId, Product>> {
    let products = gateway.products().query(Query::all()).await?;
    Ok(products.into_iter().map(|p| (p.id.clone(), p)).collect())
}

/// Join `lines` with their products, preserving line order.
///
/// # Errors
///
/// Returns an error only if the gateway fails.
pub async fn build_cart_view(gateway: &dyn Gateway, lines: &[CartLine]) -> Result<Vec<CartLineView>> {
    let catalog = catalog_index(gateway).await?;
    let view: Vec<CartLineView> = lines
        .iter()
        .filter_map(|line| {
            let product = catalog.get(&line.product_id);
            if product.is_none() {
                debug!(product_id = %line.product_id, "Skipping cart line without product");
            }
            product.map(|product| CartLineView::join(line, product))
        })
        .collect();
    Ok(view)
}

/// The subset of `lines` whose product is missing from the catalog.
///
/// # Errors
///
/// Returns an error only if the gateway fails.
pub async fn find_orphaned_lines(gateway: &dyn Gateway, lines: &[CartLine]) -> Result<Vec<CartLine>> {
    let catalog = catalog_index(gateway).await?;
    Ok(lines
        .iter()
        .filter(|line| !catalog.contains_key(&line.product_id))
        .cloned()
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cartwheel_core::{CartLineDraft, CartLineId};

    use super::*;
    use crate::store::MemoryGateway;

    fn line(product_id: &str, quantity: u32) -> CartLine {
        CartLine::with_id(
            CartLineId::generate(),
            CartLineDraft {
                product_id: ProductId::new(product_id),
                quantity,
                shipping: "Standard".to_owned(),
                payment: "PayPal".to_owned(),
            },
        )
    }

    async fn gateway_with(products: &[(&str, &str, f64)]) -> MemoryGateway {
        let gateway = MemoryGateway::new();
        for (id, name, price) in products {
            gateway
                .products()
                .insert(Product::new(ProductId::new(*id), *name, *price))
                .await
                .unwrap();
        }
        gateway
    }

    #[tokio::test]
    async fn test_view_joins_in_line_order() {
        let gateway = gateway_with(&[("a", "Alpha", 1.0), ("b", "Beta", 2.0)]).await;
        let lines = [line("b", 2), line("a", 1)];

        let view = build_cart_view(&gateway, &lines).await.unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].name, "Beta");
        assert_eq!(view[0].quantity, 2);
        assert_eq!(view[0].payment, "PayPal");
        assert_eq!(view[1].product_id, ProductId::new("a"));
    }

    #[tokio::test]
    async fn test_orphans_are_excluded_and_reported() {
        let gateway = gateway_with(&[("a", "Alpha", 1.0)]).await;
        let lines = [line("a", 1), line("gone", 3)];

        let view = build_cart_view(&gateway, &lines).await.unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Alpha");

        let orphans = find_orphaned_lines(&gateway, &lines).await.unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].product_id, ProductId::new("gone"));
    }

    #[tokio::test]
    async fn test_empty_inputs() {
        let gateway = gateway_with(&[]).await;
        assert!(build_cart_view(&gateway, &[]).await.unwrap().is_empty());
        assert!(find_orphaned_lines(&gateway, &[]).await.unwrap().is_empty());
    }
}
