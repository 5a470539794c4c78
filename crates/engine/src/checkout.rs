//! Order summaries.
//!
//! Each cart line is priced on its own: the shipping and payment methods
//! recorded on the line are bound into the contexts when their labels
//! resolve, otherwise whatever the context already holds is used.

use serde::Serialize;
use tracing::{debug, warn};

use cartwheel_core::{CartLineView, ProductId};

use crate::context::{PaymentContext, ShippingContext};
use crate::error::{OperationError, Result};
use crate::strategy::{payment_by_label, shipping_by_label};

/// One priced cart line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    /// Description of the shipping method applied.
    pub shipping: String,
    pub shipping_cost: f64,
    /// Label of the payment method applied.
    pub payment: String,
    /// `unit_price * quantity + shipping_cost`.
    pub line_total: f64,
    /// Payment confirmation for `line_total`.
    pub confirmation: String,
}

/// A priced order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub lines: Vec<OrderLine>,
    pub distance: f64,
    pub total: f64,
}

/// Price every item for delivery over `distance`.
///
/// # Errors
///
/// Returns [`OperationError::EmptyCart`] if `items` is empty.
pub fn summarize(
    items: &[CartLineView],
    distance: f64,
    shipping: &mut ShippingContext,
    payment: &mut PaymentContext,
) -> Result<OrderSummary> {
    if items.is_empty() {
        return Err(OperationError::EmptyCart);
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        match shipping_by_label(&item.shipping) {
            Some(method) => shipping.set_boxed(method),
            None => warn!(
                product_id = %item.product_id,
                label = %item.shipping,
                fallback = shipping.description(),
                "Unknown shipping label"
            ),
        }
        match payment_by_label(&item.payment) {
            Some(method) => payment.set_boxed(method),
            None => warn!(
                product_id = %item.product_id,
                label = %item.payment,
                fallback = payment.label(),
                "Unknown payment label"
            ),
        }

        let shipping_cost = shipping.calculate_cost(distance);
        let line_total = item.subtotal() + shipping_cost;
        lines.push(OrderLine {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity: item.quantity,
            shipping: shipping.description().to_owned(),
            shipping_cost,
            payment: payment.label().to_owned(),
            line_total,
            confirmation: payment.process_payment(line_total),
        });
    }

    let total: f64 = lines.iter().map(|line| line.line_total).sum();
    debug!(lines = lines.len(), total, "Summarized order");
    Ok(OrderSummary {
        lines,
        distance,
        total,
    })
}
