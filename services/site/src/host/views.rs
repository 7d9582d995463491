//! services/site/src/host/views.rs
//!
//! Render payloads for the three panels. Each is a pure function of store
//! state plus the current controls.

use chrono::{DateTime, SecondsFormat, Utc};
use portfolio_core::cart::CartStore;
use portfolio_core::catalog::{Catalog, CatalogFacets, CatalogQuery};
use portfolio_core::domain::{CartLine, Product, ProductId, Task, TaskStats};
use portfolio_core::favorites::Favorites;
use portfolio_core::tasks::{TaskFilter, TaskStore};
use serde::Serialize;

pub const NO_TASKS_MESSAGE: &str = "No tasks yet. Add your first task to get started!";
pub const NO_MATCHING_TASKS_MESSAGE: &str = "No tasks match your current filters.";

//=========================================================================================
// Task Manager
//=========================================================================================

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: &'static str,
    pub category_label: &'static str,
    pub priority: &'static str,
    pub completed: bool,
    pub created_at: String,
    pub due_date: Option<String>,
    pub overdue: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TasksView {
    pub tasks: Vec<TaskView>,
    pub stats: TaskStats,
    /// Set when nothing is visible.
    pub empty_message: Option<&'static str>,
}

impl TasksView {
    pub fn render(store: &TaskStore, filter: &TaskFilter, now: DateTime<Utc>) -> Self {
        let visible = store.list(filter);
        let empty_message = match (store.is_empty(), visible.is_empty()) {
            (true, _) => Some(NO_TASKS_MESSAGE),
            (false, true) => Some(NO_MATCHING_TASKS_MESSAGE),
            (false, false) => None,
        };
        Self {
            tasks: visible.into_iter().map(|t| task_view(t, now)).collect(),
            stats: store.stats_at(now),
            empty_message,
        }
    }
}

fn task_view(task: &Task, now: DateTime<Utc>) -> TaskView {
    TaskView {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        category: task.category.as_str(),
        category_label: task.category.label(),
        priority: task.priority.as_str(),
        completed: task.completed,
        created_at: timestamp(task.created_at),
        due_date: task.due_date.map(timestamp),
        overdue: task.is_overdue(now),
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

//=========================================================================================
// Product Showcase
//=========================================================================================

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub discount_percent: Option<u32>,
    pub rating: f64,
    pub reviews: u32,
    pub category: String,
    pub image: String,
    pub tags: Vec<String>,
    pub in_stock: bool,
    pub featured: bool,
    pub favorite: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CatalogView {
    pub products: Vec<ProductView>,
    /// "Showing {showing} of {total} products".
    pub showing: usize,
    pub total: usize,
    pub facets: CatalogFacets,
    pub sort: &'static str,
}

impl CatalogView {
    pub fn render(catalog: &Catalog, query: &CatalogQuery, favorites: &Favorites) -> Self {
        let visible = catalog.query(query);
        Self {
            showing: visible.len(),
            total: catalog.len(),
            products: visible
                .into_iter()
                .map(|p| product_view(p, favorites.contains(p.id)))
                .collect(),
            facets: catalog.facets(),
            sort: query.sort.as_str(),
        }
    }
}

fn product_view(product: &Product, favorite: bool) -> ProductView {
    ProductView {
        id: product.id,
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price,
        original_price: product.original_price,
        discount_percent: product.discount_percent(),
        rating: product.rating,
        reviews: product.reviews,
        category: product.category.clone(),
        image: product.image.clone(),
        tags: product.tags.clone(),
        in_stock: product.in_stock,
        featured: product.featured,
        favorite,
    }
}

//=========================================================================================
// Cart Dropdown
//=========================================================================================

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CartLineView {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub quantity: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    /// The badge on the cart icon.
    pub total_items: u64,
    /// Two-decimal display string, e.g. `"598.00"`.
    pub total_price: String,
}

impl CartView {
    pub fn render(cart: &CartStore) -> Self {
        Self {
            lines: cart.lines().iter().map(cart_line_view).collect(),
            total_items: cart.total_items(),
            total_price: format!("{:.2}", cart.display_total()),
        }
    }
}

fn cart_line_view(line: &CartLine) -> CartLineView {
    CartLineView {
        id: line.id,
        name: line.name.clone(),
        price: line.price,
        image: line.image.clone(),
        quantity: line.quantity,
    }
}
