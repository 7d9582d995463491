pub mod cart;
pub mod catalog;
pub mod domain;
pub mod favorites;
pub mod memory;
pub mod observer;
pub mod ports;
pub mod records;
pub mod tasks;

pub use cart::{CartEvent, CartStore};
pub use catalog::{
    Catalog, CatalogError, CatalogFacets, CatalogQuery, CategoryOption, PriceRange, SortKey,
};
pub use domain::{
    CartLine, NewTask, Notification, NotificationVariant, Priority, Product, ProductId, Selection,
    Task, TaskCategory, TaskId, TaskPatch, TaskStats,
};
pub use favorites::Favorites;
pub use memory::MemoryStorage;
pub use observer::{Observers, SubscriptionId};
pub use ports::{Clock, LocalStorage, Notifier, PortError, PortResult, SystemClock};
pub use tasks::{TaskError, TaskEvent, TaskFilter, TaskStore};
