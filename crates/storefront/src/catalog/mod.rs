//! Static product catalog.
//!
//! The catalog is compiled into the binary from `data/catalog.json` and
//! parsed once at start-up. It is read-only: carts and orders keep their own
//! clones of the products they reference.

mod listing;

pub use listing::{PriceRange, ProductListing, SortOrder};

use quickcart_core::{CategoryId, ProductId, SubcategoryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Embedded catalog source.
const CATALOG_JSON: &str = include_str!("../../data/catalog.json");

/// Default number of related products shown on a product page.
pub const RELATED_LIMIT: usize = 4;

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog data is not valid: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id in catalog: {0}")]
    DuplicateProduct(ProductId),

    #[error("product {product} references unknown category {category}")]
    UnknownCategory {
        product: ProductId,
        category: CategoryId,
    },
}

/// A product in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Current selling price.
    pub price: Decimal,
    /// Price before discount (equal to `price` when not discounted).
    pub original_price: Decimal,
    /// Discount percentage shown on the product card.
    pub discount: u8,
    /// Pack size label (e.g., "500 g", "6 pieces").
    pub weight: String,
    pub image_url: String,
    pub category: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<SubcategoryId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub is_featured: bool,
}

/// A subcategory within a [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: SubcategoryId,
    pub name: String,
}

/// A top-level product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub image_url: String,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

#[derive(Deserialize)]
struct CatalogData {
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// Read-only catalog of categories and products, in source order.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Catalog {
    /// Load the catalog compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the embedded data is malformed.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(CATALOG_JSON)
    }

    /// Parse and validate a catalog document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on malformed JSON, duplicate product ids or
    /// products pointing at categories that do not exist.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(raw)?;
        Self::new(data.categories, data.products)
    }

    /// Build a catalog from already-constructed parts.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on duplicate product ids or unknown categories.
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
            if !categories.iter().any(|c| c.id == product.category) {
                return Err(CatalogError::UnknownCategory {
                    product: product.id.clone(),
                    category: product.category.clone(),
                });
            }
        }

        tracing::debug!(
            categories = categories.len(),
            products = products.len(),
            "Catalog loaded"
        );
        Ok(Self {
            categories,
            products,
        })
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id.as_str() == id)
    }

    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_str() == id)
    }

    /// Products in a category, in catalog order.
    #[must_use]
    pub fn by_category(&self, category_id: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category.as_str() == category_id)
            .collect()
    }

    /// Products in a category narrowed to one subcategory.
    #[must_use]
    pub fn in_subcategory(&self, category_id: &str, subcategory_id: &str) -> Vec<&Product> {
        self.by_category(category_id)
            .into_iter()
            .filter(|p| {
                p.subcategory
                    .as_ref()
                    .is_some_and(|s| s.as_str() == subcategory_id)
            })
            .collect()
    }

    /// Products flagged as featured.
    #[must_use]
    pub fn featured(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_featured).collect()
    }

    /// Up to `limit` other products from the same category.
    #[must_use]
    pub fn related(&self, product_id: &str, limit: usize) -> Vec<&Product> {
        let Some(product) = self.product(product_id) else {
            return Vec::new();
        };

        self.products
            .iter()
            .filter(|p| p.id != product.id && p.category == product.category)
            .take(limit)
            .collect()
    }

    /// Case-insensitive substring search over name, description and tags.
    ///
    /// A blank query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;

    /// Minimal product for tests elsewhere in the crate.
    pub(crate) fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Decimal::from(price),
            original_price: Decimal::from(price),
            discount: 0,
            weight: "1 pc".to_string(),
            image_url: String::new(),
            category: CategoryId::new("test"),
            subcategory: None,
            tags: Vec::new(),
            in_stock: true,
            rating: None,
            is_featured: false,
        }
    }

    #[test]
    fn test_embedded_catalog_loads() {
        let catalog = Catalog::embedded().unwrap();
        assert_eq!(catalog.products().len(), 20);
        assert_eq!(catalog.categories().len(), 10);
        assert_eq!(catalog.product("p1").unwrap().name, "Fresh Onion");
    }

    #[test]
    fn test_by_category_and_subcategory() {
        let catalog = Catalog::embedded().unwrap();
        let dairy = catalog.by_category("dairy-breakfast");
        let ids: Vec<&str> = dairy.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p3", "p4", "p5", "p20"]);

        let milk = catalog.in_subcategory("dairy-breakfast", "milk");
        assert_eq!(milk.len(), 2);
        assert!(catalog.by_category("no-such-category").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog::embedded().unwrap();
        let hits = catalog.search("DETTOL");
        let ids: Vec<&str> = hits.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p12", "p17"]);

        // matches description text too
        assert!(catalog.search("chapatis").iter().any(|p| p.id.as_str() == "p9"));
        assert!(catalog.search("   ").is_empty());
    }

    #[test]
    fn test_search_matches_tags() {
        let mut organic = product("t1", 10);
        organic.tags = vec!["Organic".to_string()];
        let catalog = Catalog::new(
            vec![Category {
                id: CategoryId::new("test"),
                name: "Test".to_string(),
                image_url: String::new(),
                subcategories: Vec::new(),
            }],
            vec![organic, product("t2", 20)],
        )
        .unwrap();

        let hits = catalog.search("organ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "t1");
    }

    #[test]
    fn test_related_excludes_self_and_respects_limit() {
        let catalog = Catalog::embedded().unwrap();
        let related = catalog.related("p1", RELATED_LIMIT);
        assert_eq!(related.len(), 4);
        assert!(related.iter().all(|p| p.id.as_str() != "p1"));
        assert!(
            related
                .iter()
                .all(|p| p.category.as_str() == "fruits-vegetables")
        );
        assert!(catalog.related("missing", RELATED_LIMIT).is_empty());
    }

    #[test]
    fn test_featured_preserves_order() {
        let catalog = Catalog::embedded().unwrap();
        let featured = catalog.featured();
        assert_eq!(featured[0].id.as_str(), "p1");
        assert!(featured.iter().all(|p| p.is_featured));
    }

    #[test]
    fn test_rejects_duplicates_and_unknown_categories() {
        let category = Category {
            id: CategoryId::new("test"),
            name: "Test".to_string(),
            image_url: String::new(),
            subcategories: Vec::new(),
        };

        let dup = Catalog::new(vec![category.clone()], vec![product("a", 1), product("a", 2)]);
        assert!(matches!(dup, Err(CatalogError::DuplicateProduct(_))));

        let mut stray = product("b", 1);
        stray.category = CategoryId::new("elsewhere");
        let unknown = Catalog::new(vec![category], vec![stray]);
        assert!(matches!(unknown, Err(CatalogError::UnknownCategory { .. })));
    }
}
