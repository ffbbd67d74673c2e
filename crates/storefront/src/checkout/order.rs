//! Placed-order records.

use chrono::{DateTime, Utc};
use quickcart_core::{DeliveryTier, PaymentMethod};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::cart::CartEntry;
use crate::catalog::Product;
use crate::pricing::Breakdown;

/// Identifies a placed order.
///
/// `order_id` is unique; `display` is the short `BK######` code shown to the
/// shopper and may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReference {
    pub order_id: Uuid,
    pub display: String,
}

impl OrderReference {
    #[must_use]
    pub fn generate() -> Self {
        let digits: u32 = rand::rng().random_range(100_000..=999_999);
        Self {
            order_id: Uuid::new_v4(),
            display: format!("BK{digits}"),
        }
    }
}

/// A line of a placed order with the price paid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub product: Product,
    pub quantity: u32,
    pub price: Decimal,
}

impl From<&CartEntry> for OrderItem {
    fn from(entry: &CartEntry) -> Self {
        Self {
            price: entry.product.price,
            product: entry.product.clone(),
            quantity: entry.quantity,
        }
    }
}

/// Everything captured when an order is submitted, before it completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingOrder {
    pub items: Vec<OrderItem>,
    pub delivery: DeliveryTier,
    pub payment: PaymentMethod,
    pub breakdown: Breakdown,
    pub customer_name: String,
    pub phone: String,
    pub delivery_address: String,
}

/// Shown once the order has been placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    pub reference: OrderReference,
    pub items: Vec<OrderItem>,
    pub delivery: DeliveryTier,
    pub delivery_label: &'static str,
    pub payment: PaymentMethod,
    pub payment_label: &'static str,
    pub breakdown: Breakdown,
    pub customer_name: String,
    pub phone: String,
    pub delivery_address: String,
    /// Promised window in minutes.
    pub estimated_delivery: (u32, u32),
    pub placed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    pub(crate) fn from_pending(pending: PendingOrder, reference: OrderReference) -> Self {
        Self {
            reference,
            items: pending.items,
            delivery: pending.delivery,
            delivery_label: pending.delivery.label(),
            payment: pending.payment,
            payment_label: pending.payment.label(),
            breakdown: pending.breakdown,
            customer_name: pending.customer_name,
            phone: pending.phone,
            delivery_address: pending.delivery_address,
            estimated_delivery: pending.delivery.window_minutes(),
            placed_at: Utc::now(),
        }
    }
}
