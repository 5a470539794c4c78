//! Product sort strategies.
//!
//! All orderings are stable: products comparing equal keep their incoming
//! relative order.

use cartwheel_core::Product;

/// An ordering over catalog products.
pub trait SortStrategy: Send + Sync {
    /// Return `products` reordered.
    fn sort(&self, products: Vec<Product>) -> Vec<Product>;
}

impl<T: SortStrategy + ?Sized> SortStrategy for Box<T> {
    fn sort(&self, products: Vec<Product>) -> Vec<Product> {
        (**self).sort(products)
    }
}

/// By name, ascending, ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortAlphabetically;

impl SortStrategy for SortAlphabetically {
    fn sort(&self, mut products: Vec<Product>) -> Vec<Product> {
        products.sort_by_cached_key(|p| p.name.to_lowercase());
        products
    }
}

/// Cheapest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortByPriceLowToHigh;

impl SortStrategy for SortByPriceLowToHigh {
    fn sort(&self, mut products: Vec<Product>) -> Vec<Product> {
        products.sort_by(|a, b| a.price.total_cmp(&b.price));
        products
    }
}

/// Most expensive first.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortByPriceHighToLow;

impl SortStrategy for SortByPriceHighToLow {
    fn sort(&self, mut products: Vec<Product>) -> Vec<Product> {
        products.sort_by(|a, b| b.price.total_cmp(&a.price));
        products
    }
}

#[cfg(test)]
mod tests {
    use cartwheel_core::ProductId;
    use proptest::prelude::*;

    use super::*;

    fn product(id: &str, name: &str, price: f64) -> Product {
        Product::new(ProductId::new(id), name, price)
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_alphabetical_ignores_case() {
        let sorted = SortAlphabetically.sort(vec![
            product("1", "Banana", 1.0),
            product("2", "apple", 2.0),
            product("3", "cherry", 3.0),
        ]);
        assert_eq!(names(&sorted), ["apple", "Banana", "cherry"]);
    }

    #[test]
    fn test_alphabetical_is_stable_for_case_variants() {
        let sorted = SortAlphabetically.sort(vec![
            product("1", "widget", 1.0),
            product("2", "Widget", 2.0),
            product("3", "WIDGET", 3.0),
        ]);
        let ids: Vec<_> = sorted.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_price_orders() {
        let catalog = vec![
            product("1", "Mid", 5.0),
            product("2", "Low", 1.0),
            product("3", "High", 9.0),
        ];
        assert_eq!(
            names(&SortByPriceLowToHigh.sort(catalog.clone())),
            ["Low", "Mid", "High"]
        );
        assert_eq!(
            names(&SortByPriceHighToLow.sort(catalog)),
            ["High", "Mid", "Low"]
        );
    }

    #[test]
    fn test_price_ties_keep_input_order() {
        let catalog = vec![
            product("1", "A", 2.0),
            product("2", "B", 1.0),
            product("3", "C", 2.0),
        ];
        let high: Vec<_> = SortByPriceHighToLow
            .sort(catalog.clone())
            .iter()
            .map(|p| p.id.to_string())
            .collect();
        assert_eq!(high, ["1", "3", "2"]);
        let low: Vec<_> = SortByPriceLowToHigh
            .sort(catalog)
            .iter()
            .map(|p| p.id.to_string())
            .collect();
        assert_eq!(low, ["2", "1", "3"]);
    }

    proptest! {
        #[test]
        fn low_to_high_reverses_high_to_low(
            prices in proptest::collection::hash_set(0u32..100_000, 0..40)
        ) {
            let catalog: Vec<Product> = prices
                .into_iter()
                .enumerate()
                .map(|(i, cents)| product(&i.to_string(), "p", f64::from(cents) / 100.0))
                .collect();

            let ascending = SortByPriceLowToHigh.sort(catalog.clone());
            let mut descending = SortByPriceHighToLow.sort(catalog);
            descending.reverse();
            prop_assert_eq!(ascending, descending);
        }
    }
}
