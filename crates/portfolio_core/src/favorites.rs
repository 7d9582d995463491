//! crates/portfolio_core/src/favorites.rs
//!
//! The heart toggle on product cards. Kept in memory only.

use crate::domain::ProductId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    ids: Vec<ProductId>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or removes `id`; returns whether it is now a favorite.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        if let Some(index) = self.ids.iter().position(|f| *f == id) {
            self.ids.remove(index);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    /// Favorites in the order they were marked.
    pub fn iter(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
