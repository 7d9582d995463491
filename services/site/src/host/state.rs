//! services/site/src/host/state.rs
//!
//! Defines the page state: every widget store plus the controls that shape
//! their views. It is created once when the page mounts.

use crate::adapters::FileStorage;
use crate::config::Config;
use crate::error::SiteError;
use portfolio_core::cart::CartStore;
use portfolio_core::catalog::{Catalog, CatalogQuery, PriceRange};
use portfolio_core::favorites::Favorites;
use portfolio_core::memory::MemoryStorage;
use portfolio_core::ports::{Clock, LocalStorage, Notifier, SystemClock};
use portfolio_core::tasks::{TaskFilter, TaskStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

//=========================================================================================
// Render Bookkeeping
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Tasks,
    Catalog,
    Cart,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Tasks, Panel::Catalog, Panel::Cart];
}

/// Which panels need re-rendering. Store subscriptions set these flags; the
/// handler clears them when it renders.
#[derive(Debug, Default)]
pub struct RenderFlags {
    tasks: AtomicBool,
    catalog: AtomicBool,
    cart: AtomicBool,
}

impl RenderFlags {
    fn flag(&self, panel: Panel) -> &AtomicBool {
        match panel {
            Panel::Tasks => &self.tasks,
            Panel::Catalog => &self.catalog,
            Panel::Cart => &self.cart,
        }
    }

    pub fn mark(&self, panel: Panel) {
        self.flag(panel).store(true, Ordering::Relaxed);
    }

    pub fn mark_all(&self) {
        Panel::ALL.into_iter().for_each(|p| self.mark(p));
    }

    /// Returns whether `panel` was marked, clearing the mark.
    pub fn take(&self, panel: Panel) -> bool {
        self.flag(panel).swap(false, Ordering::Relaxed)
    }
}

//=========================================================================================
// SiteState
//=========================================================================================

pub struct SiteState {
    pub tasks: TaskStore,
    pub task_filter: TaskFilter,
    pub catalog: Catalog,
    pub catalog_query: CatalogQuery,
    pub favorites: Favorites,
    /// The only state shared between widgets: the showcase adds to it and the
    /// navigation bar displays it.
    pub cart: CartStore,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    pub render: Arc<RenderFlags>,
}

impl SiteState {
    /// Builds the page from configuration: picks the storage backend, loads
    /// the catalog and restores saved tasks.
    pub fn init(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self, SiteError> {
        let storage: Arc<dyn LocalStorage> = match &config.storage_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "Using file-backed local storage");
                Arc::new(FileStorage::open(dir)?)
            }
            None => {
                info!("No STORAGE_DIR set, tasks will not outlive this process");
                Arc::new(MemoryStorage::new())
            }
        };

        let catalog = match &config.catalog_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let catalog = Catalog::from_json(&raw)?;
                info!(path = %path.display(), products = catalog.len(), "Loaded product catalog");
                catalog
            }
            None => Catalog::sample(),
        };

        Ok(Self::new(
            storage,
            &config.tasks_storage_key,
            catalog,
            PriceRange::new(0.0, config.price_range_max),
            notifier,
            Arc::new(SystemClock),
        ))
    }

    pub fn new(
        storage: Arc<dyn LocalStorage>,
        tasks_storage_key: &str,
        catalog: Catalog,
        price_range: PriceRange,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let render = Arc::new(RenderFlags::default());

        let mut tasks = TaskStore::load_with_clock(storage, tasks_storage_key, clock.clone());
        {
            let render = render.clone();
            tasks.subscribe(move |_| render.mark(Panel::Tasks));
        }
        let mut cart = CartStore::new();
        {
            let render = render.clone();
            cart.subscribe(move |_| render.mark(Panel::Cart));
        }

        Self {
            tasks,
            task_filter: TaskFilter::default(),
            catalog,
            catalog_query: CatalogQuery {
                price_range,
                ..Default::default()
            },
            favorites: Favorites::new(),
            cart,
            notifier,
            clock,
            render,
        }
    }
}
