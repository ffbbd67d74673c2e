//! Cart commands over the persisted cart snapshot.

use std::sync::Arc;

use quickcart_core::Price;
use quickcart_storefront::cart::CartLedger;
use quickcart_storefront::pricing::{self, Coupon};

use super::{CliError, Context};

/// Print the cart and its breakdown, optionally previewing a coupon.
///
/// # Errors
///
/// Returns an error if the cart cannot be read or the coupon is unknown.
pub fn show(ctx: &Context, coupon: Option<&str>) -> Result<(), CliError> {
    let ledger = CartLedger::load(Arc::clone(&ctx.store))?;
    if ledger.is_empty() {
        tracing::info!("Cart is empty");
        return Ok(());
    }

    let coupon = coupon.map(Coupon::parse).transpose()?;

    for entry in ledger.entries() {
        tracing::info!(
            "  {:<5} {:<40} {:>3} x {:>8} = {}",
            entry.id.as_str(),
            entry.product.name,
            entry.quantity,
            Price::inr(entry.product.price).to_string(),
            Price::inr(entry.line_total())
        );
    }

    let breakdown = pricing::cart_breakdown(ledger.subtotal(), coupon);
    tracing::info!("Items:    {}", ledger.total_items());
    tracing::info!("Subtotal: {}", Price::inr(breakdown.subtotal));
    if breakdown.free_delivery() {
        tracing::info!("Delivery: FREE");
    } else {
        tracing::info!("Delivery: {}", Price::inr(breakdown.delivery_fee));
    }
    if coupon.is_some() {
        tracing::info!("Discount: -{}", Price::inr(breakdown.discount));
    }
    tracing::info!("Total:    {}", Price::inr(breakdown.total));
    Ok(())
}

/// Add `quantity` units of a product.
///
/// # Errors
///
/// Returns `CliError::UnknownProduct` for an id outside the catalog, or a
/// storage error.
pub fn add(ctx: &Context, product_id: &str, quantity: u32) -> Result<(), CliError> {
    let product = ctx
        .catalog
        .product(product_id)
        .ok_or_else(|| CliError::UnknownProduct(product_id.to_owned()))?;

    let mut ledger = CartLedger::load(Arc::clone(&ctx.store))?;
    ledger.add(product, quantity)?;
    tracing::info!(
        "{} in cart: {}",
        product.name,
        ledger.quantity_of(product_id)
    );
    Ok(())
}

/// Remove one unit of a product.
///
/// # Errors
///
/// Returns a storage error if the cart cannot be saved.
pub fn remove(ctx: &Context, product_id: &str) -> Result<(), CliError> {
    let mut ledger = CartLedger::load(Arc::clone(&ctx.store))?;
    ledger.remove(product_id)?;
    tracing::info!("{product_id} in cart: {}", ledger.quantity_of(product_id));
    Ok(())
}

/// Set the quantity of a product already in the cart.
///
/// # Errors
///
/// Returns a storage error if the cart cannot be saved.
pub fn set(ctx: &Context, product_id: &str, quantity: i64) -> Result<(), CliError> {
    let mut ledger = CartLedger::load(Arc::clone(&ctx.store))?;
    ledger.set_quantity(product_id, quantity)?;
    tracing::info!("{product_id} in cart: {}", ledger.quantity_of(product_id));
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns a storage error if the cart cannot be saved.
pub fn clear(ctx: &Context) -> Result<(), CliError> {
    CartLedger::load(Arc::clone(&ctx.store))?.clear()?;
    tracing::info!("Cart cleared");
    Ok(())
}
