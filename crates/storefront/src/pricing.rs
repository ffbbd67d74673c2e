//! Price breakdowns for the cart summary and the checkout page.
//!
//! The two pages apply different delivery-fee rules and are kept as two
//! separate functions:
//!
//! | page     | delivery fee                               | tax | coupon |
//! |----------|--------------------------------------------|-----|--------|
//! | cart     | free above ₹99 subtotal, else ₹20          | -   | yes    |
//! | checkout | ₹40 express / ₹20 standard, any subtotal   | 5%  | -      |
//!
//! Nothing here is cached; callers recompute from the live ledger.

use quickcart_core::DeliveryTier;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// The only coupon code the store accepts.
pub const COUPON_CODE: &str = "FIRST100";

/// Cart page: subtotal strictly above this ships free.
const FREE_DELIVERY_ABOVE: Decimal = Decimal::from_parts(99, 0, 0, false, 0);

/// Cart page: fee when the subtotal is not above the threshold.
const CART_DELIVERY_FEE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

const EXPRESS_FEE: Decimal = Decimal::from_parts(40, 0, 0, false, 0);
const STANDARD_FEE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// 5%, checkout page only.
const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// 10% of subtotal ...
const COUPON_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
/// ... capped at ₹50.
const COUPON_CAP: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Coupon rejections.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("invalid coupon code: {0}")]
    UnknownCoupon(String),
}

/// Derived figures shown to the shopper. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    /// `subtotal + delivery_fee + tax - discount`. Not floored at zero.
    pub total: Decimal,
}

impl Breakdown {
    fn new(subtotal: Decimal, delivery_fee: Decimal, tax: Decimal, discount: Decimal) -> Self {
        Self {
            subtotal,
            delivery_fee,
            tax,
            discount,
            total: subtotal + delivery_fee + tax - discount,
        }
    }

    /// Whether the delivery fee was waived.
    #[must_use]
    pub fn free_delivery(&self) -> bool {
        self.delivery_fee.is_zero()
    }
}

/// A recognised coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coupon;

impl Coupon {
    /// Accept [`COUPON_CODE`] in any letter case, ignoring surrounding spaces.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::UnknownCoupon` for any other code.
    pub fn parse(code: &str) -> Result<Self, PricingError> {
        if code.trim().eq_ignore_ascii_case(COUPON_CODE) {
            Ok(Self)
        } else {
            Err(PricingError::UnknownCoupon(code.to_owned()))
        }
    }

    /// `min(50, 10% of subtotal)`.
    #[must_use]
    pub fn discount(self, subtotal: Decimal) -> Decimal {
        (subtotal * COUPON_RATE).min(COUPON_CAP)
    }
}

/// Result of [`CouponState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponOutcome {
    Applied,
    /// The coupon was already active; nothing changed.
    AlreadyApplied,
}

/// Coupon applied during the current session (not persisted).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CouponState {
    applied: Option<Coupon>,
}

impl CouponState {
    /// Apply a coupon code. Applying twice has no further effect.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::UnknownCoupon` and leaves the state untouched
    /// when the code is not recognised.
    pub fn apply(&mut self, code: &str) -> Result<CouponOutcome, PricingError> {
        let coupon = Coupon::parse(code)?;
        if self.applied.is_some() {
            return Ok(CouponOutcome::AlreadyApplied);
        }
        self.applied = Some(coupon);
        Ok(CouponOutcome::Applied)
    }

    #[must_use]
    pub const fn coupon(&self) -> Option<Coupon> {
        self.applied
    }

    #[must_use]
    pub const fn is_applied(&self) -> bool {
        self.applied.is_some()
    }

    pub fn reset(&mut self) {
        self.applied = None;
    }
}

/// Cart page breakdown.
#[must_use]
pub fn cart_breakdown(subtotal: Decimal, coupon: Option<Coupon>) -> Breakdown {
    let delivery_fee = if subtotal > FREE_DELIVERY_ABOVE {
        Decimal::ZERO
    } else {
        CART_DELIVERY_FEE
    };
    let discount = coupon.map_or(Decimal::ZERO, |c| c.discount(subtotal));
    Breakdown::new(subtotal, delivery_fee, Decimal::ZERO, discount)
}

/// Checkout page breakdown for the chosen delivery tier.
#[must_use]
pub fn checkout_breakdown(subtotal: Decimal, tier: DeliveryTier) -> Breakdown {
    let tax = subtotal * TAX_RATE;
    Breakdown::new(subtotal, delivery_fee(tier), tax, Decimal::ZERO)
}

/// Checkout delivery fee for a tier.
#[must_use]
pub const fn delivery_fee(tier: DeliveryTier) -> Decimal {
    match tier {
        DeliveryTier::Express => EXPRESS_FEE,
        DeliveryTier::Standard => STANDARD_FEE,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn d(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_rate_constants() {
        assert_eq!(FREE_DELIVERY_ABOVE, d(99));
        assert_eq!(CART_DELIVERY_FEE, d(20));
        assert_eq!(delivery_fee(DeliveryTier::Express), d(40));
        assert_eq!(delivery_fee(DeliveryTier::Standard), d(20));
        assert_eq!(TAX_RATE, Decimal::new(5, 2));
        assert_eq!(COUPON_RATE, Decimal::new(10, 2));
        assert_eq!(COUPON_CAP, d(50));
    }

    #[test]
    fn test_cart_free_delivery_above_99() {
        let b = cart_breakdown(d(100), None);
        assert_eq!(b.delivery_fee, Decimal::ZERO);
        assert_eq!(b.total, d(100));
        assert!(b.free_delivery());
    }

    #[test]
    fn test_cart_fee_at_or_below_99() {
        let b = cart_breakdown(d(99), None);
        assert_eq!(b.delivery_fee, d(20));
        assert_eq!(b.total, d(119));
    }

    #[test]
    fn test_checkout_standard_with_tax() {
        let b = checkout_breakdown(d(50), DeliveryTier::Standard);
        assert_eq!(b.delivery_fee, d(20));
        assert_eq!(b.tax, Decimal::new(25, 1));
        assert_eq!(b.total, Decimal::new(725, 1));
    }

    #[test]
    fn test_checkout_fee_ignores_subtotal() {
        let b = checkout_breakdown(d(500), DeliveryTier::Express);
        assert_eq!(b.delivery_fee, d(40));
        assert_eq!(b.tax, d(25));
        assert_eq!(b.discount, Decimal::ZERO);
        assert_eq!(b.total, d(565));
    }

    #[test]
    fn test_coupon_discount_capped() {
        assert_eq!(Coupon.discount(d(300)), d(30));
        assert_eq!(Coupon.discount(d(1000)), d(50));

        let b = cart_breakdown(d(300), Some(Coupon));
        assert_eq!(b.discount, d(30));
        assert_eq!(b.total, d(270));
    }

    #[test]
    fn test_coupon_case_insensitive() {
        for code in ["FIRST100", "first100", "First100", " fIrSt100 "] {
            assert_eq!(Coupon::parse(code), Ok(Coupon));
        }
    }

    #[test]
    fn test_coupon_applies_once() {
        let mut state = CouponState::default();
        assert_eq!(state.apply("first100"), Ok(CouponOutcome::Applied));
        assert_eq!(state.apply("FIRST100"), Ok(CouponOutcome::AlreadyApplied));

        let once = cart_breakdown(d(300), state.coupon());
        assert_eq!(once.discount, d(30));
    }

    #[test]
    fn test_unknown_coupon_rejected_without_state_change() {
        let mut state = CouponState::default();
        let before = cart_breakdown(d(80), state.coupon());

        let err = state.apply("SAVE20").unwrap_err();
        assert_eq!(err, PricingError::UnknownCoupon("SAVE20".to_string()));
        assert!(!state.is_applied());
        assert_eq!(cart_breakdown(d(80), state.coupon()), before);
    }

    #[test]
    fn test_total_not_floored() {
        // Discount never exceeds subtotal with the current coupon, but the
        // formula itself does not clamp.
        let b = Breakdown::new(d(10), d(0), d(0), d(30));
        assert_eq!(b.total, d(-20));
    }
}
