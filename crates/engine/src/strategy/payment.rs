//! Payment method strategies.
//!
//! Pure and infallible: a method only names itself and renders a
//! confirmation. Fees, authorization and fraud checks would hook in here.

/// A way of paying for an order.
pub trait PaymentMethod: Send + Sync {
    /// Human-readable method name.
    fn label(&self) -> &str;

    /// Confirmation text for charging `amount`.
    fn process_payment(&self, amount: f64) -> String {
        format!("Payment of ${amount:.2} processed via {}.", self.label())
    }
}

impl<T: PaymentMethod + ?Sized> PaymentMethod for Box<T> {
    fn label(&self) -> &str {
        (**self).label()
    }

    fn process_payment(&self, amount: f64) -> String {
        (**self).process_payment(amount)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CreditCardPayment;

impl PaymentMethod for CreditCardPayment {
    fn label(&self) -> &str {
        "Credit Card"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PayPalPayment;

impl PaymentMethod for PayPalPayment {
    fn label(&self) -> &str {
        "PayPal"
    }
}

/// Mobile wallet payment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplePayPayment;

impl PaymentMethod for ApplePayPayment {
    fn label(&self) -> &str {
        "Apple Pay"
    }
}

/// Resolve a stored payment label back to its strategy.
///
/// Matching ignores case, spaces, hyphens and underscores, so
/// `"CreditCard"`, `"credit card"` and `"credit-card"` are equivalent.
#[must_use]
pub fn payment_by_label(label: &str) -> Option<Box<dyn PaymentMethod>> {
    match normalize(label).as_str() {
        "creditcard" | "card" => Some(Box::new(CreditCardPayment)),
        "paypal" => Some(Box::new(PayPalPayment)),
        "applepay" | "mobilewallet" | "wallet" => Some(Box::new(ApplePayPayment)),
        _ => None,
    }
}

pub(crate) fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
