//! crates/portfolio_core/src/cart.rs
//!
//! The shopping cart shared by the product showcase and the navigation bar.
//! Lines are keyed by product id; unknown ids are silently ignored.

use crate::domain::{CartLine, Product, ProductId};
use crate::observer::{Observers, SubscriptionId};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    Added { id: ProductId, quantity: u32 },
    QuantityChanged { id: ProductId, quantity: u32 },
    Removed(ProductId),
    Cleared,
}

#[derive(Debug, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
    observers: Observers<CartEvent>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit. An existing line for the product is incremented;
    /// otherwise a new line snapshots the product's name, price and image.
    /// Returns the line's new quantity. Stock is not checked here; the
    /// showcase disables the button for unavailable products.
    pub fn add_to_cart(&mut self, product: &Product) -> u32 {
        let quantity = match self.lines.iter_mut().find(|l| l.id == product.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(1);
                line.quantity
            }
            None => {
                self.lines.push(CartLine {
                    id: product.id,
                    name: product.name.clone(),
                    price: product.price,
                    image: product.image.clone(),
                    quantity: 1,
                });
                1
            }
        };
        self.emit(CartEvent::Added {
            id: product.id,
            quantity,
        });
        quantity
    }

    /// Sets the quantity; zero or less removes the line. Returns `false` when
    /// the product is not in the cart.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_from_cart(id);
        }
        let Some(line) = self.lines.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let quantity = line.quantity;
        self.emit(CartEvent::QuantityChanged { id, quantity });
        true
    }

    pub fn remove_from_cart(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        if self.lines.len() == before {
            return false;
        }
        self.emit(CartEvent::Removed(id));
        true
    }

    pub fn clear_cart(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        self.lines.clear();
        self.emit(CartEvent::Cleared);
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn quantity_of(&self, id: ProductId) -> Option<u32> {
        self.lines.iter().find(|l| l.id == id).map(|l| l.quantity)
    }

    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Unrounded sum of price × quantity.
    pub fn total_price(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// The total rounded to cents, for display.
    pub fn display_total(&self) -> f64 {
        round_cents(self.total_price())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&CartEvent) + Send + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn emit(&mut self, event: CartEvent) {
        debug!(?event, "Cart changed");
        self.observers.notify(&event);
    }
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use rstest::rstest;
    use std::sync::{Arc, Mutex};

    fn headphones() -> Product {
        Catalog::sample().get(1).cloned().unwrap()
    }

    #[test]
    fn adding_twice_merges_into_one_line() {
        let mut cart = CartStore::new();
        assert_eq!(cart.add_to_cart(&headphones()), 1);
        assert_eq!(cart.add_to_cart(&headphones()), 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.display_total(), 598.00);
    }

    #[test]
    fn line_keeps_snapshot_taken_at_add_time() {
        let mut cart = CartStore::new();
        let mut product = headphones();
        cart.add_to_cart(&product);

        product.price = 1.0;
        product.name = "Renamed".into();
        cart.add_to_cart(&product);

        let line = &cart.lines()[0];
        assert_eq!(line.price, 299.0);
        assert_eq!(line.name, "Premium Wireless Headphones");
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn stock_flag_does_not_gate_the_cart() {
        let catalog = Catalog::sample();
        let jacket = catalog.get(5).unwrap();
        assert!(!jacket.in_stock);

        let mut cart = CartStore::new();
        assert_eq!(cart.add_to_cart(jacket), 1);
        assert_eq!(cart.total_items(), 1);
        assert_eq!(cart.display_total(), 189.0);
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn non_positive_quantity_removes_line(#[case] quantity: i64) {
        let catalog = Catalog::sample();
        let mut cart = CartStore::new();
        cart.add_to_cart(catalog.get(1).unwrap());
        cart.add_to_cart(catalog.get(3).unwrap());

        assert!(cart.update_quantity(1, quantity));
        assert_eq!(cart.quantity_of(1), None);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn update_sets_quantity_without_upper_bound() {
        let mut cart = CartStore::new();
        cart.add_to_cart(&headphones());
        assert!(cart.update_quantity(1, 250));
        assert_eq!(cart.total_items(), 250);
        assert!(!cart.update_quantity(42, 3));
    }

    #[test]
    fn totals_sum_before_rounding() {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "name": "Dime", "price": 0.1, "category": "coins"},
                {"id": 2, "name": "Fifth", "price": 0.2, "category": "coins"}]"#,
        )
        .unwrap();
        let mut cart = CartStore::new();
        for _ in 0..3 {
            cart.add_to_cart(catalog.get(1).unwrap());
        }
        cart.add_to_cart(catalog.get(2).unwrap());

        assert_eq!(cart.display_total(), 0.5);
    }

    #[test]
    fn remove_and_clear_notify_only_on_change() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut cart = CartStore::new();
        {
            let events = events.clone();
            cart.subscribe(move |e| events.lock().unwrap().push(e.clone()));
        }

        cart.add_to_cart(&headphones());
        assert!(!cart.remove_from_cart(9));
        assert!(cart.remove_from_cart(1));
        cart.clear_cart();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                CartEvent::Added { id: 1, quantity: 1 },
                CartEvent::Removed(1),
            ]
        );
    }
}
