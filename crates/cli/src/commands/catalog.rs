//! Catalog browsing commands.

use quickcart_core::Price;
use quickcart_storefront::catalog::{Product, ProductListing, RELATED_LIMIT, SortOrder};

use super::{CliError, Context};

/// List products, all or one category's, in the given order.
///
/// # Errors
///
/// Returns `CliError::UnknownCategory` if `category` is not in the catalog.
pub fn list(ctx: &Context, category: Option<&str>, sort: SortOrder) -> Result<(), CliError> {
    let products = match category {
        Some(id) => {
            let category = ctx
                .catalog
                .category(id)
                .ok_or_else(|| CliError::UnknownCategory(id.to_owned()))?;
            tracing::info!("{} ({} subcategories)", category.name, category.subcategories.len());
            ctx.catalog.by_category(id)
        }
        None => ctx.catalog.products().iter().collect(),
    };

    let listing = ProductListing { sort, price: None };
    print_products(&listing.apply(products));
    Ok(())
}

/// Show one product with related products.
///
/// # Errors
///
/// Returns `CliError::UnknownProduct` if the id is not in the catalog.
pub fn show(ctx: &Context, id: &str) -> Result<(), CliError> {
    let product = ctx
        .catalog
        .product(id)
        .ok_or_else(|| CliError::UnknownProduct(id.to_owned()))?;

    tracing::info!("{} [{}]", product.name, product.id);
    tracing::info!("  {}", product.description);
    tracing::info!(
        "  {} ({}, was {}, {}% off)",
        Price::inr(product.price),
        product.weight,
        Price::inr(product.original_price),
        product.discount
    );
    if !product.in_stock {
        tracing::info!("  Out of stock");
    }

    let related = ctx.catalog.related(id, RELATED_LIMIT);
    if !related.is_empty() {
        tracing::info!("Related:");
        print_products(&related);
    }
    Ok(())
}

pub fn search(ctx: &Context, query: &str) {
    let results = ctx.catalog.search(query);
    if results.is_empty() {
        tracing::info!("No products match {query:?}");
        return;
    }
    tracing::info!("{} result(s) for {query:?}", results.len());
    print_products(&results);
}

pub fn featured(ctx: &Context) {
    print_products(&ctx.catalog.featured());
}

fn print_products(products: &[&Product]) {
    for product in products {
        tracing::info!(
            "  {:<5} {:<40} {:>8}  {}",
            product.id.as_str(),
            product.name,
            Price::inr(product.price).to_string(),
            product.weight
        );
    }
}
