//! Sorting and price filtering for product lists.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// Sort order offered on product lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Relevance,
    PriceLowHigh,
    PriceHighLow,
    /// Case-insensitive alphabetical by name.
    NameAZ,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceLowHigh => "price-low-high",
            Self::PriceHighLow => "price-high-low",
            Self::NameAZ => "name-a-z",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Relevance,
            Self::PriceLowHigh,
            Self::PriceHighLow,
            Self::NameAZ,
        ]
        .into_iter()
        .find(|sort| sort.as_str() == s)
        .ok_or_else(|| format!("invalid sort order: {s}"))
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    /// Cheapest and most expensive price in `products`, or `None` if empty.
    #[must_use]
    pub fn of<'a>(products: impl IntoIterator<Item = &'a Product>) -> Option<Self> {
        products.into_iter().fold(None, |range, p| {
            Some(match range {
                None => Self {
                    min: p.price,
                    max: p.price,
                },
                Some(Self { min, max }) => Self {
                    min: min.min(p.price),
                    max: max.max(p.price),
                },
            })
        })
    }

    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        price >= self.min && price <= self.max
    }
}

/// A sort order plus optional price filter applied to a list of products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductListing {
    pub sort: SortOrder,
    pub price: Option<PriceRange>,
}

impl ProductListing {
    /// Filter then sort. Ties keep their incoming order.
    #[must_use]
    pub fn apply<'a>(&self, products: Vec<&'a Product>) -> Vec<&'a Product> {
        let mut out: Vec<&Product> = products
            .into_iter()
            .filter(|p| self.price.is_none_or(|range| range.contains(p.price)))
            .collect();

        match self.sort {
            SortOrder::Relevance => {}
            SortOrder::PriceLowHigh => out.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceHighLow => out.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::NameAZ => out.sort_by(|a, b| compare_names(&a.name, &b.name)),
        }
        out
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
