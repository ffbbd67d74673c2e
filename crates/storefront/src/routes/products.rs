//! Category and product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::{Category, PriceRange, Product, ProductListing, RELATED_LIMIT, SortOrder};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Category page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub subcategory: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

/// Category page data.
#[derive(Serialize)]
pub struct CategoryView<'a> {
    pub category: &'a Category,
    pub products: Vec<&'a Product>,
    /// Price bounds of the unfiltered list, for the price slider.
    pub price_bounds: Option<PriceRange>,
    pub sort: SortOrder,
}

/// Product page data.
#[derive(Serialize)]
pub struct ProductView<'a> {
    pub product: &'a Product,
    pub related: Vec<&'a Product>,
    pub quantity_in_cart: u32,
    pub price_display: String,
}

/// Display a category with its products.
#[instrument(skip(state))]
pub async fn category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<Response> {
    let catalog = state.catalog();
    let category = catalog
        .category(&id)
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;

    let products = match query.subcategory.as_deref() {
        Some(sub) if !sub.is_empty() => catalog.in_subcategory(&id, sub),
        _ => catalog.by_category(&id),
    };
    let price_bounds = PriceRange::of(products.iter().copied());

    let listing = ProductListing {
        sort: query.sort,
        price: price_filter(&query, price_bounds),
    };

    Ok(Json(CategoryView {
        category,
        products: listing.apply(products),
        price_bounds,
        sort: query.sort,
    })
    .into_response())
}

/// Explicit bounds from the query; a missing side falls back to the list's own bound.
fn price_filter(query: &ListingQuery, bounds: Option<PriceRange>) -> Option<PriceRange> {
    if query.min_price.is_none() && query.max_price.is_none() {
        return None;
    }
    let bounds = bounds?;
    Some(PriceRange {
        min: query.min_price.unwrap_or(bounds.min),
        max: query.max_price.unwrap_or(bounds.max),
    })
}

/// Display a product with related products.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let catalog = state.catalog();
    let product = catalog
        .product(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let quantity_in_cart = state.session().lock().await.cart.quantity_of(&id);

    Ok(Json(ProductView {
        product,
        related: catalog.related(&id, RELATED_LIMIT),
        quantity_in_cart,
        price_display: quickcart_core::Price::inr(product.price).display(),
    })
    .into_response())
}
