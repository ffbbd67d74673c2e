//! Delivery location commands.

use std::sync::Arc;

use quickcart_storefront::location::{self, Location, LocationBook};

use super::{CliError, Context};

/// Print locations matching `query`; a blank query lists them all.
pub fn search(query: &str) {
    let matches: Vec<&Location> = if query.trim().is_empty() {
        location::candidates().iter().collect()
    } else {
        location::search(query)
    };

    if matches.is_empty() {
        tracing::info!("No locations match {query:?}");
        return;
    }
    for loc in matches {
        print_location(loc);
    }
}

/// Make a candidate location the current one.
///
/// # Errors
///
/// Returns `LocationError::UnknownLocation` for an id that is not a
/// candidate, or a storage error.
pub fn select(ctx: &Context, id: &str) -> Result<(), CliError> {
    let mut book = LocationBook::load(Arc::clone(&ctx.store))?;
    let selected = book.select_by_id(id)?;
    tracing::info!("Delivering to {}", selected.address);
    Ok(())
}

/// Print the current location and recent history.
///
/// # Errors
///
/// Returns a storage error if the snapshots cannot be read.
pub fn show(ctx: &Context) -> Result<(), CliError> {
    let book = LocationBook::load(Arc::clone(&ctx.store))?;
    match book.current() {
        Some(current) => {
            tracing::info!("Current:");
            print_location(current);
        }
        None => tracing::info!("No delivery location set"),
    }

    if !book.recent().is_empty() {
        tracing::info!("Recent:");
        for loc in book.recent() {
            print_location(loc);
        }
    }
    Ok(())
}

fn print_location(loc: &Location) {
    tracing::info!("  {:<3} {:<28} {}", loc.id.as_str(), loc.address, loc.full_address);
}
