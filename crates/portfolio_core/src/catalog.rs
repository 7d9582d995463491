//! crates/portfolio_core/src/catalog.rs
//!
//! The read-only product catalog and its search / filter / sort pipeline.
//! The catalog never changes after construction; every view is recomputed
//! from it and the current `CatalogQuery`.

use crate::domain::{Product, ProductId, Selection};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
    #[error("product {0} must have a positive price")]
    InvalidPrice(ProductId),
    #[error("product {0} has an original price below its price")]
    InvalidOriginalPrice(ProductId),
    #[error("product {0} must have a rating between 0 and 5")]
    InvalidRating(ProductId),
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

//=========================================================================================
// Query Types
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Rating,
    Reviews,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Featured,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Rating,
        SortKey::Reviews,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Featured => "featured",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Rating => "rating",
            SortKey::Reviews => "reviews",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Featured => "Featured",
            SortKey::PriceLow => "Price: Low to High",
            SortKey::PriceHigh => "Price: High to Low",
            SortKey::Rating => "Highest Rated",
            SortKey::Reviews => "Most Reviews",
        }
    }
}

impl FromStr for SortKey {
    type Err = crate::domain::ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| crate::domain::ParseVariantError {
                kind: "sort key",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive price bounds, as set by the range slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub const DEFAULT_MAX: f64 = 1000.0;

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(0.0, Self::DEFAULT_MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogQuery {
    pub search: String,
    pub category: Selection<String>,
    pub price_range: PriceRange,
    pub sort: SortKey,
}

/// An entry of the category dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

/// Counts shown as quick-filter badges, taken over the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CatalogFacets {
    pub in_stock: usize,
    pub featured: usize,
    pub on_sale: usize,
}

//=========================================================================================
// Catalog
//=========================================================================================

#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::with_capacity(products.len());
        for product in &products {
            if !ids.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if !(product.price.is_finite() && product.price > 0.0) {
                return Err(CatalogError::InvalidPrice(product.id));
            }
            if product.original_price.is_some_and(|original| original < product.price) {
                return Err(CatalogError::InvalidOriginalPrice(product.id));
            }
            if !(0.0..=5.0).contains(&product.rating) {
                return Err(CatalogError::InvalidRating(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Parses a JSON array of products in the same camelCase shape the site's
    /// front-end data uses.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let records: Vec<ProductRecord> = serde_json::from_str(raw)?;
        Self::new(records.into_iter().map(ProductRecord::to_domain).collect())
    }

    /// Runs the search, category and price filters, then sorts stably. The
    /// default `Featured` order moves featured items first and otherwise keeps
    /// catalog order.
    pub fn query(&self, query: &CatalogQuery) -> Vec<&Product> {
        let needle = query.search.to_lowercase();
        let mut visible: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| {
                p.matches_text(&needle)
                    && query.category.matches(&p.category)
                    && query.price_range.contains(p.price)
            })
            .collect();

        match query.sort {
            SortKey::PriceLow => visible.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortKey::PriceHigh => visible.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortKey::Rating => visible.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            SortKey::Reviews => visible.sort_by(|a, b| b.reviews.cmp(&a.reviews)),
            SortKey::Featured => visible.sort_by_key(|p| !p.featured),
        }
        visible
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn facets(&self) -> CatalogFacets {
        CatalogFacets {
            in_stock: self.products.iter().filter(|p| p.in_stock).count(),
            featured: self.products.iter().filter(|p| p.featured).count(),
            on_sale: self.products.iter().filter(|p| p.is_on_sale()).count(),
        }
    }

    /// Categories present in the catalog: the well-known ones in their usual
    /// order, then any others in first-seen order.
    pub fn categories(&self) -> Vec<CategoryOption> {
        let present: Vec<&str> = {
            let mut seen = HashSet::new();
            self.products
                .iter()
                .map(|p| p.category.as_str())
                .filter(|c| seen.insert(*c))
                .collect()
        };

        let known = KNOWN_CATEGORIES
            .iter()
            .filter(|(value, _)| present.contains(value))
            .map(|(value, label)| CategoryOption {
                value: value.to_string(),
                label: label.to_string(),
            });
        let other = present
            .iter()
            .filter(|c| !KNOWN_CATEGORIES.iter().any(|(value, _)| value == *c))
            .map(|c| CategoryOption {
                value: c.to_string(),
                label: capitalize(c),
            });
        known.chain(other).collect()
    }

    /// The demo catalog shown on the site.
    pub fn sample() -> Self {
        Self {
            products: sample_products(),
        }
    }
}

const KNOWN_CATEGORIES: [(&str, &str); 4] = [
    ("electronics", "Electronics"),
    ("clothing", "Clothing"),
    ("home", "Home & Office"),
    ("food", "Food & Beverages"),
];

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//=========================================================================================
// "Impure" Product Record Struct
//=========================================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: ProductId,
    name: String,
    #[serde(default)]
    description: String,
    price: f64,
    #[serde(default)]
    original_price: Option<f64>,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    reviews: u32,
    category: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default = "default_in_stock")]
    in_stock: bool,
    #[serde(default)]
    featured: bool,
}

fn default_in_stock() -> bool {
    true
}

impl ProductRecord {
    fn to_domain(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            original_price: self.original_price,
            rating: self.rating,
            reviews: self.reviews,
            category: self.category,
            image: self.image,
            tags: self.tags,
            in_stock: self.in_stock,
            featured: self.featured,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: ProductId,
    name: &str,
    price: f64,
    original_price: Option<f64>,
    rating: f64,
    reviews: u32,
    category: &str,
    image: &str,
    description: &str,
    tags: &[&str],
    in_stock: bool,
    featured: bool,
) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: description.to_string(),
        price,
        original_price,
        rating,
        reviews,
        category: category.to_string(),
        image: image.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        in_stock,
        featured,
    }
}

fn sample_products() -> Vec<Product> {
    vec![
        product(
            1,
            "Premium Wireless Headphones",
            299.0,
            Some(399.0),
            4.8,
            1234,
            "electronics",
            "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=400&h=300&fit=crop",
            "High-quality wireless headphones with noise cancellation and premium sound quality.",
            &["wireless", "bluetooth", "noise-canceling"],
            true,
            true,
        ),
        product(
            2,
            "Smart Fitness Watch",
            249.0,
            None,
            4.6,
            856,
            "electronics",
            "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=400&h=300&fit=crop",
            "Advanced fitness tracking with heart rate monitoring and GPS functionality.",
            &["fitness", "smartwatch", "gps"],
            true,
            true,
        ),
        product(
            3,
            "Organic Coffee Beans",
            24.0,
            None,
            4.9,
            456,
            "food",
            "https://images.unsplash.com/photo-1559056199-641a0ac8b55e?w=400&h=300&fit=crop",
            "Premium organic coffee beans sourced from sustainable farms.",
            &["organic", "fair-trade", "premium"],
            true,
            false,
        ),
        product(
            4,
            "Minimalist Desk Lamp",
            89.0,
            Some(120.0),
            4.4,
            234,
            "home",
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400&h=300&fit=crop",
            "Modern LED desk lamp with adjustable brightness and wireless charging base.",
            &["led", "wireless-charging", "modern"],
            true,
            false,
        ),
        product(
            5,
            "Vintage Leather Jacket",
            189.0,
            None,
            4.7,
            678,
            "clothing",
            "https://images.unsplash.com/photo-1551028719-00167b16eac5?w=400&h=300&fit=crop",
            "Classic vintage-style leather jacket made from genuine leather.",
            &["leather", "vintage", "classic"],
            false,
            false,
        ),
        product(
            6,
            "Professional Camera Lens",
            599.0,
            None,
            4.9,
            123,
            "electronics",
            "https://images.unsplash.com/photo-1606983340126-99ab4feaa64a?w=400&h=300&fit=crop",
            "High-performance telephoto lens for professional photography.",
            &["photography", "telephoto", "professional"],
            true,
            true,
        ),
        product(
            7,
            "Ergonomic Office Chair",
            349.0,
            Some(449.0),
            4.5,
            567,
            "home",
            "https://images.unsplash.com/photo-1586023492125-27b2c045efd7?w=400&h=300&fit=crop",
            "Comfortable ergonomic office chair with lumbar support and adjustable height.",
            &["ergonomic", "office", "comfort"],
            true,
            false,
        ),
        product(
            8,
            "Artisan Tea Collection",
            45.0,
            None,
            4.6,
            289,
            "food",
            "https://images.unsplash.com/photo-1597318821089-425c7c23e8e4?w=400&h=300&fit=crop",
            "Curated collection of premium artisan teas from around the world.",
            &["tea", "artisan", "collection"],
            true,
            false,
        ),
    ]
}
