//! Strategy contexts.
//!
//! A context holds exactly one strategy of its family and delegates to it
//! without adding behavior of its own. The strategy can be replaced at any
//! time; contexts never share state with each other.

use cartwheel_core::Product;

use crate::error::Result;
use crate::strategy::{
    CartOperation, CartOutcome, PaymentMethod, ProductOperation, ProductOutcome, ShippingMethod,
    SortStrategy,
};

/// Runs whichever cart operation is currently bound.
pub struct CartContext {
    strategy: Box<dyn CartOperation>,
}

impl CartContext {
    #[must_use]
    pub fn new(strategy: impl CartOperation + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    pub fn set_strategy(&mut self, strategy: impl CartOperation + 'static) {
        self.strategy = Box::new(strategy);
    }

    pub fn set_boxed(&mut self, strategy: Box<dyn CartOperation>) {
        self.strategy = strategy;
    }

    /// Execute the bound operation.
    ///
    /// # Errors
    ///
    /// Propagates the operation's error unchanged.
    pub async fn execute(&self) -> Result<CartOutcome> {
        self.strategy.execute().await
    }
}

/// Runs whichever product operation is currently bound.
pub struct ProductContext {
    strategy: Box<dyn ProductOperation>,
}

impl ProductContext {
    #[must_use]
    pub fn new(strategy: impl ProductOperation + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    pub fn set_strategy(&mut self, strategy: impl ProductOperation + 'static) {
        self.strategy = Box::new(strategy);
    }

    pub fn set_boxed(&mut self, strategy: Box<dyn ProductOperation>) {
        self.strategy = strategy;
    }

    /// Execute the bound operation.
    ///
    /// # Errors
    ///
    /// Propagates the operation's error unchanged.
    pub async fn execute(&self) -> Result<ProductOutcome> {
        self.strategy.execute().await
    }
}

pub struct PaymentContext {
    strategy: Box<dyn PaymentMethod>,
}

impl PaymentContext {
    #[must_use]
    pub fn new(strategy: impl PaymentMethod + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    pub fn set_strategy(&mut self, strategy: impl PaymentMethod + 'static) {
        self.strategy = Box::new(strategy);
    }

    pub fn set_boxed(&mut self, strategy: Box<dyn PaymentMethod>) {
        self.strategy = strategy;
    }

    #[must_use]
    pub fn label(&self) -> &str {
        self.strategy.label()
    }

    #[must_use]
    pub fn process_payment(&self, amount: f64) -> String {
        self.strategy.process_payment(amount)
    }
}

pub struct ShippingContext {
    strategy: Box<dyn ShippingMethod>,
}

impl ShippingContext {
    #[must_use]
    pub fn new(strategy: impl ShippingMethod + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    pub fn set_strategy(&mut self, strategy: impl ShippingMethod + 'static) {
        self.strategy = Box::new(strategy);
    }

    pub fn set_boxed(&mut self, strategy: Box<dyn ShippingMethod>) {
        self.strategy = strategy;
    }

    #[must_use]
    pub fn calculate_cost(&self, distance: f64) -> f64 {
        self.strategy.calculate_cost(distance)
    }

    #[must_use]
    pub fn description(&self) -> &str {
        self.strategy.description()
    }
}

pub struct SortContext {
    strategy: Box<dyn SortStrategy>,
}

impl SortContext {
    #[must_use]
    pub fn new(strategy: impl SortStrategy + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }

    pub fn set_strategy(&mut self, strategy: impl SortStrategy + 'static) {
        self.strategy = Box::new(strategy);
    }

    pub fn set_boxed(&mut self, strategy: Box<dyn SortStrategy>) {
        self.strategy = strategy;
    }

    #[must_use]
    pub fn sort(&self, products: Vec<Product>) -> Vec<Product> {
        self.strategy.sort(products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use cartwheel_core::ProductId;

    use super::*;
    use crate::store::MemoryGateway;
    use crate::strategy::{
        AddProduct, AddToCart, CreditCardPayment, ExpressShipping, FetchCartItems, FetchProducts,
        NewProduct, PayPalPayment, SortAlphabetically, SortByPriceHighToLow, SortByPriceLowToHigh,
        StandardShipping,
    };

    #[tokio::test]
    async fn test_cart_context_swaps_operation() {
        let gateway = Arc::new(MemoryGateway::new());
        AddProduct::new(
            gateway.clone(),
            NewProduct::new("Widget", 9.99).with_id(ProductId::new("p1")),
        )
        .execute()
        .await
        .unwrap();

        let mut context = CartContext::new(AddToCart::new(
            gateway.clone(),
            ProductId::new("p1"),
            "Standard",
            "CreditCard",
        ));
        assert_eq!(context.execute().await.unwrap(), CartOutcome::Applied);

        context.set_strategy(FetchCartItems::new(gateway.clone()));
        let items = context.execute().await.unwrap().into_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_product_context_propagates_errors() {
        let gateway = Arc::new(MemoryGateway::new());
        let product = NewProduct::new("Widget", 9.99).with_id(ProductId::new("p1"));
        let mut context = ProductContext::new(AddProduct::new(gateway.clone(), product));
        context.execute().await.unwrap();
        assert!(context.execute().await.is_err());

        context.set_boxed(Box::new(FetchProducts::new(gateway)));
        let products = context.execute().await.unwrap().into_products().unwrap();
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn test_payment_context_swap() {
        let mut context = PaymentContext::new(CreditCardPayment);
        assert_eq!(
            context.process_payment(9.99),
            "Payment of $9.99 processed via Credit Card."
        );
        context.set_strategy(PayPalPayment);
        assert_eq!(context.label(), "PayPal");
        assert_eq!(
            context.process_payment(9.99),
            "Payment of $9.99 processed via PayPal."
        );
    }

    #[test]
    fn test_shipping_contexts_are_independent() {
        let mut first = ShippingContext::new(StandardShipping);
        let second = ShippingContext::new(StandardShipping);
        first.set_strategy(ExpressShipping);

        assert_eq!(first.description(), "Express Shipping");
        assert_eq!(second.description(), "Standard Shipping");
        assert!((first.calculate_cost(10.0) - 20.0).abs() < 1e-9);
        assert!((second.calculate_cost(10.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_sort_context_swap() {
        let catalog = vec![
            Product::new(ProductId::new("1"), "banana", 5.0),
            Product::new(ProductId::new("2"), "Apple", 3.0),
        ];
        let mut context = SortContext::new(SortAlphabetically);
        assert_eq!(context.sort(catalog.clone())[0].name, "Apple");
        context.set_strategy(SortByPriceHighToLow);
        assert_eq!(context.sort(catalog.clone())[0].name, "banana");

        let cheapest_first: Box<dyn SortStrategy> = Box::new(SortByPriceLowToHigh);
        context.set_boxed(cheapest_first);
        let sorted = context.sort(catalog);
        assert_eq!(sorted[0].name, "Apple");
        assert_eq!(sorted[1].name, "banana");
    }
}
