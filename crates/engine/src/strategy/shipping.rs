//! Shipping method strategies.
//!
//! Costs are linear in distance: `base + rate * distance`. Express dominates
//! Standard on both terms, so it is never cheaper for a non-negative
//! distance.

use super::payment::normalize;

/// A way of delivering an order.
pub trait ShippingMethod: Send + Sync {
    /// Cost of shipping over `distance`.
    fn calculate_cost(&self, distance: f64) -> f64;

    /// Human-readable method name.
    fn description(&self) -> &str;
}

impl<T: ShippingMethod + ?Sized> ShippingMethod for Box<T> {
    fn calculate_cost(&self, distance: f64) -> f64 {
        (**self).calculate_cost(distance)
    }

    fn description(&self) -> &str {
        (**self).description()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardShipping;

impl StandardShipping {
    pub const BASE: f64 = 5.0;
    pub const RATE: f64 = 0.5;
}

impl ShippingMethod for StandardShipping {
    fn calculate_cost(&self, distance: f64) -> f64 {
        Self::RATE.mul_add(distance, Self::BASE)
    }

    fn description(&self) -> &str {
        "Standard Shipping"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressShipping;

impl ExpressShipping {
    pub const BASE: f64 = 10.0;
    pub const RATE: f64 = 1.0;
}

impl ShippingMethod for ExpressShipping {
    fn calculate_cost(&self, distance: f64) -> f64 {
        Self::RATE.mul_add(distance, Self::BASE)
    }

    fn description(&self) -> &str {
        "Express Shipping"
    }
}

/// Resolve a stored shipping label back to its strategy.
///
/// Accepts both the short name (`"Standard"`) and the description
/// (`"Standard Shipping"`), ignoring case and punctuation.
#[must_use]
pub fn shipping_by_label(label: &str) -> Option<Box<dyn ShippingMethod>> {
    let normalized = normalize(label);
    match normalized.strip_suffix("shipping").unwrap_or(&normalized) {
        "standard" => Some(Box::new(StandardShipping)),
        "express" => Some(Box::new(ExpressShipping)),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_costs() {
        assert!((StandardShipping.calculate_cost(10.0) - 10.0).abs() < 1e-9);
        assert!((ExpressShipping.calculate_cost(10.0) - 20.0).abs() < 1e-9);
        assert!((StandardShipping.calculate_cost(0.0) - 5.0).abs() < 1e-9);
        assert!((ExpressShipping.calculate_cost(0.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(StandardShipping.description(), "Standard Shipping");
        assert_eq!(ExpressShipping.description(), "Express Shipping");
    }

    #[test]
    fn test_shipping_by_label() {
        assert_eq!(
            shipping_by_label("Standard").unwrap().description(),
            "Standard Shipping"
        );
        assert_eq!(
            shipping_by_label("Express Shipping").unwrap().description(),
            "Express Shipping"
        );
        assert_eq!(
            shipping_by_label("express").unwrap().description(),
            "Express Shipping"
        );
        assert!(shipping_by_label("Overnight").is_none());
        assert!(shipping_by_label("").is_none());
    }

    proptest! {
        #[test]
        fn express_never_cheaper_than_standard(distance in 0.0f64..1.0e6) {
            prop_assert!(
                ExpressShipping.calculate_cost(distance) >= StandardShipping.calculate_cost(distance)
            );
        }

        #[test]
        fn cost_grows_with_distance(a in 0.0f64..1.0e6, b in 0.0f64..1.0e6) {
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(StandardShipping.calculate_cost(near) <= StandardShipping.calculate_cost(far));
            prop_assert!(ExpressShipping.calculate_cost(near) <= ExpressShipping.calculate_cost(far));
        }
    }
}
