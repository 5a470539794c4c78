//! Price a single line without touching storage.
//!
//! # Usage
//!
//! ```bash
//! cartwheel quote --price 9.99 --quantity 2
//! cartwheel quote --price 24.50 --shipping Express --payment "Apple Pay" --distance 42
//! ```

use cartwheel_core::{CartLineView, ProductId};
use cartwheel_engine::checkout;
use cartwheel_engine::context::{PaymentContext, ShippingContext};
use cartwheel_engine::strategy::{CreditCardPayment, StandardShipping};

use super::{CommandError, print_summary};

/// A single line to price.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub price: f64,
    pub quantity: u32,
    pub shipping: String,
    pub payment: String,
    pub distance: f64,
}

/// Print the summary for one line.
///
/// Unrecognized labels fall back to standard shipping and credit card.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub fn run(request: QuoteRequest, json: bool) -> Result<(), CommandError> {
    let item = CartLineView {
        name: "Quoted item".to_string(),
        price: request.price,
        quantity: request.quantity,
        product_id: ProductId::new("quote"),
        shipping: request.shipping,
        payment: request.payment,
    };
    let mut shipping = ShippingContext::new(StandardShipping);
    let mut payment = PaymentContext::new(CreditCardPayment);
    let summary = checkout::summarize(&[item], request.distance, &mut shipping, &mut payment)?;
    print_summary(&summary, json)
}
