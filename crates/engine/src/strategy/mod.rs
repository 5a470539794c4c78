//! Interchangeable behaviors, one trait per family.
//!
//! - [`cart`] and [`product`]: async units of work against the gateway
//! - [`payment`] and [`shipping`]: pure pricing and confirmation rules
//! - [`sort`]: catalog orderings

pub mod cart;
pub mod payment;
pub mod product;
pub mod shipping;
pub mod sort;

pub use cart::{
    AddToCart, CartOperation, CartOutcome, ClearCart, FetchCartItems, PurgeOrphanedLines,
    RemoveFromCart,
};
pub use payment::{
    ApplePayPayment, CreditCardPayment, PayPalPayment, PaymentMethod, payment_by_label,
};
pub use product::{
    AddProduct, DeleteProduct, FetchProducts, NewProduct, ProductOperation, ProductOutcome,
};
pub use shipping::{ExpressShipping, ShippingMethod, StandardShipping, shipping_by_label};
pub use sort::{SortAlphabetically, SortByPriceHighToLow, SortByPriceLowToHigh, SortStrategy};
