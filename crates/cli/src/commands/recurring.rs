//! Recurring order commands for the signed-in user.

use std::sync::Arc;

use quickcart_core::{DeliveryTime, Frequency, ProductId};
use quickcart_storefront::models::User;
use quickcart_storefront::recurring::{RecurringDraft, RecurringItem, RecurringStore};
use quickcart_storefront::services::AuthSession;

use super::{CliError, Context};

/// Build a draft from command-line arguments.
#[must_use]
pub fn draft(
    product: &str,
    quantity: u32,
    frequency: Frequency,
    delivery_time: DeliveryTime,
    auto_pay_enabled: bool,
) -> RecurringDraft {
    RecurringDraft {
        product_id: ProductId::new(product),
        quantity,
        frequency,
        delivery_time,
        auto_pay_enabled,
    }
}

fn signed_in_user(ctx: &Context) -> Result<User, CliError> {
    AuthSession::load(Arc::clone(&ctx.store))?
        .user()
        .cloned()
        .ok_or(CliError::NotSignedIn)
}

/// List the signed-in user's items.
///
/// # Errors
///
/// Returns `CliError::NotSignedIn` without a stored user, or a storage error.
pub fn list(ctx: &Context) -> Result<(), CliError> {
    let user = signed_in_user(ctx)?;
    let store = RecurringStore::load(Arc::clone(&ctx.store))?;

    let mut count = 0;
    for item in store.owned_by(&user.id) {
        print_item(ctx, item);
        count += 1;
    }
    if count == 0 {
        tracing::info!("No recurring items for {}", user.email);
    }
    Ok(())
}

/// Add an item for the signed-in user.
///
/// # Errors
///
/// Returns `CliError::NotSignedIn` without a stored user,
/// `RecurringError::UnknownProduct` or `RecurringError::InvalidQuantity` for
/// a bad draft, or a storage error.
pub fn add(ctx: &Context, draft: RecurringDraft) -> Result<(), CliError> {
    let user = signed_in_user(ctx)?;
    let mut store = RecurringStore::load(Arc::clone(&ctx.store))?;
    let item = store.add(&user.id, draft, &ctx.catalog)?;
    tracing::info!("Added recurring item {}", item.id);
    print_item(ctx, &item);
    Ok(())
}

/// Delete one of the signed-in user's items by id.
///
/// # Errors
///
/// Returns `CliError::NotSignedIn` without a stored user,
/// `RecurringError::NotFound` for an unknown id, or a storage error.
pub fn delete(ctx: &Context, id: &str) -> Result<(), CliError> {
    let user = signed_in_user(ctx)?;
    let removed = RecurringStore::load(Arc::clone(&ctx.store))?.delete(&user.id, id)?;
    tracing::info!("Deleted recurring item {}", removed.id);
    Ok(())
}

fn print_item(ctx: &Context, item: &RecurringItem) {
    let name = ctx
        .catalog
        .product(item.product_id.as_str())
        .map_or(item.product_id.as_str(), |p| p.name.as_str());
    tracing::info!(
        "  {}  {} x{}  {} at {}{}",
        item.id,
        name,
        item.quantity,
        item.frequency,
        item.delivery_time,
        if item.auto_pay_enabled { "  (auto-pay)" } else { "" }
    );
}
