//! Product catalog: storefront bundles with base prices and point
//! multipliers.
//!
//! Multipliers are keyed by [`ProductId`], injected as configuration. A
//! product the catalog does not know earns the plain 1.0 multiplier rather
//! than failing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ids::ProductId;

/// A catalog product. The catalog is static configuration, not user-mutable
/// state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Display name shown by the command layer.
    pub name: String,

    /// Base price in USD. Always positive.
    pub base_price_usd: f64,

    /// Loyalty points multiplier applied when this product is purchased.
    pub points_multiplier: f64,
}

impl Product {
    /// Create a product with the default 1.0 multiplier.
    #[must_use]
    pub fn new(name: impl Into<String>, base_price_usd: f64) -> Self {
        Self {
            name: name.into(),
            base_price_usd,
            points_multiplier: 1.0,
        }
    }

    /// Set the points multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.points_multiplier = multiplier;
        self
    }
}

/// The storefront's product catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalog {
    products: HashMap<ProductId, Product>,
}

impl Default for ProductCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();

        catalog.insert(
            ProductId::new("bundle-1000").expect("static id"),
            Product::new("1,000 Bundle", 8.99),
        );
        catalog.insert(
            ProductId::new("bundle-2800").expect("static id"),
            Product::new("2,800 Bundle", 22.99),
        );
        catalog.insert(
            ProductId::new("bundle-5000").expect("static id"),
            Product::new("5,000 Bundle", 36.99).with_multiplier(2.0),
        );
        catalog.insert(
            ProductId::new("bundle-13500").expect("static id"),
            Product::new("13,500 Bundle", 89.99).with_multiplier(1.5),
        );

        catalog
    }
}

impl ProductCatalog {
    /// Create a catalog with no products.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            products: HashMap::new(),
        }
    }

    /// Create a catalog from an explicit product map.
    #[must_use]
    pub fn from_products(products: HashMap<ProductId, Product>) -> Self {
        Self { products }
    }

    /// Add or replace a product.
    pub fn insert(&mut self, id: ProductId, product: Product) {
        self.products.insert(id, product);
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    /// The points multiplier for a purchase, 1.0 when the product is absent
    /// or unknown.
    #[must_use]
    pub fn multiplier_for(&self, product: Option<&ProductId>) -> f64 {
        product
            .and_then(|id| self.products.get(id))
            .map_or(1.0, |p| p.points_multiplier)
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
