//! services/site/src/host/handler.rs
//!
//! Applies one `UiEvent` to the page state and renders the panels it changed.

use crate::host::protocol::{UiEvent, ViewUpdate};
use crate::host::state::{Panel, SiteState};
use crate::host::views::{CartView, CatalogView, TasksView};
use chrono::{DateTime, NaiveDate, Utc};
use portfolio_core::domain::{
    NewTask, Notification, Priority, Selection, TaskCategory, TaskId, TaskPatch,
};
use portfolio_core::tasks::TaskError;
use std::str::FromStr;
use tracing::{debug, warn};

/// A field of an event that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("invalid {field}: {reason}")]
struct InvalidField {
    field: &'static str,
    reason: String,
}

fn parse_field<T>(field: &'static str, raw: &str) -> Result<T, InvalidField>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| InvalidField {
        field,
        reason: e.to_string(),
    })
}

fn parse_optional<T>(field: &'static str, raw: Option<&str>) -> Result<Option<T>, InvalidField>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|r| parse_field(field, r)).transpose()
}

/// Accepts a date input value (`YYYY-MM-DD`, read as midnight UTC) or a full
/// RFC 3339 timestamp.
fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, InvalidField> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| InvalidField {
            field: "due date",
            reason: format!("'{raw}' is neither YYYY-MM-DD nor RFC 3339"),
        })
}

/// Applies `event`, then renders every panel whose state changed.
pub fn dispatch(state: &mut SiteState, event: UiEvent) -> Vec<ViewUpdate> {
    let mut updates = Vec::new();
    if let Err(e) = apply(state, event) {
        warn!(error = %e, "Rejected UI event");
        updates.push(ViewUpdate::Error {
            message: e.to_string(),
        });
    }
    updates.extend(render_marked(state));
    updates
}

/// Renders every panel, as on first mount.
pub fn render_all(state: &SiteState) -> Vec<ViewUpdate> {
    state.render.mark_all();
    render_marked(state)
}

fn render_marked(state: &SiteState) -> Vec<ViewUpdate> {
    Panel::ALL
        .into_iter()
        .filter(|panel| state.render.take(*panel))
        .map(|panel| {
            debug!(?panel, "Rendering panel");
            match panel {
                Panel::Tasks => ViewUpdate::Tasks(TasksView::render(
                    &state.tasks,
                    &state.task_filter,
                    state.clock.now(),
                )),
                Panel::Catalog => ViewUpdate::Catalog(CatalogView::render(
                    &state.catalog,
                    &state.catalog_query,
                    &state.favorites,
                )),
                Panel::Cart => ViewUpdate::Cart(CartView::render(&state.cart)),
            }
        })
        .collect()
}

fn apply(state: &mut SiteState, event: UiEvent) -> Result<(), InvalidField> {
    match event {
        //=================================================================================
        // Task Manager
        //=================================================================================
        UiEvent::AddTask {
            title,
            description,
            category,
            priority,
            due_date,
        } => {
            // A blank title is reported before any other field is parsed.
            if title.trim().is_empty() {
                state
                    .notifier
                    .notify(Notification::error("Error", TaskError::EmptyTitle.to_string()));
                return Ok(());
            }
            let mut input = NewTask::new(title);
            input.description = description;
            input.category = parse_optional("category", category.as_deref())?.unwrap_or_default();
            input.priority = parse_optional("priority", priority.as_deref())?.unwrap_or_default();
            input.due_date = due_date
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(parse_due_date)
                .transpose()?;

            match state.tasks.add(input) {
                Ok(_) => state
                    .notifier
                    .notify(Notification::success("Success", "Task added successfully")),
                Err(e @ TaskError::EmptyTitle) => state
                    .notifier
                    .notify(Notification::error("Error", e.to_string())),
            }
        }
        UiEvent::ToggleTask { id } => {
            state.tasks.toggle_complete(&TaskId::from(id));
        }
        UiEvent::UpdateTask {
            id,
            title,
            description,
            category,
            priority,
            due_date,
        } => {
            let patch = TaskPatch {
                title,
                description: description.map(|d| Some(d).filter(|d| !d.is_empty())),
                category: parse_optional("category", category.as_deref())?,
                priority: parse_optional("priority", priority.as_deref())?,
                completed: None,
                due_date: match due_date.as_deref() {
                    None => None,
                    Some("") => Some(None),
                    Some(raw) => Some(Some(parse_due_date(raw)?)),
                },
            };
            state.tasks.update(&TaskId::from(id), patch);
        }
        UiEvent::DeleteTask { id } => {
            if state.tasks.remove(&TaskId::from(id)) {
                state
                    .notifier
                    .notify(Notification::success("Success", "Task deleted successfully"));
            }
        }
        UiEvent::ClearCompleted => {
            let removed = state.tasks.clear_completed();
            if removed > 0 {
                state.notifier.notify(Notification::success(
                    "Success",
                    format!("Cleared {removed} completed task(s)"),
                ));
            }
        }
        UiEvent::SetTaskFilter {
            search,
            category,
            priority,
            show_completed,
        } => {
            let mut filter = state.task_filter.clone();
            if let Some(search) = search {
                filter.search = search;
            }
            let category: Option<Selection<TaskCategory>> =
                parse_optional("category", category.as_deref())?;
            if let Some(category) = category {
                filter.category = category;
            }
            let priority: Option<Selection<Priority>> =
                parse_optional("priority", priority.as_deref())?;
            if let Some(priority) = priority {
                filter.priority = priority;
            }
            if let Some(show_completed) = show_completed {
                filter.show_completed = show_completed;
            }
            state.task_filter = filter;
            state.render.mark(Panel::Tasks);
        }

        //=================================================================================
        // Product Showcase
        //=================================================================================
        UiEvent::SetCatalogQuery {
            search,
            category,
            min_price,
            max_price,
            sort,
        } => {
            let mut query = state.catalog_query.clone();
            if let Some(search) = search {
                query.search = search;
            }
            if let Some(category) = category {
                query.category = match category.as_str() {
                    "all" => Selection::All,
                    _ => Selection::Only(category),
                };
            }
            if let Some(min) = min_price {
                query.price_range.min = min;
            }
            if let Some(max) = max_price {
                query.price_range.max = max;
            }
            if let Some(sort) = parse_optional("sort", sort.as_deref())? {
                query.sort = sort;
            }
            state.catalog_query = query;
            state.render.mark(Panel::Catalog);
        }
        UiEvent::ToggleFavorite { product_id } => {
            if state.catalog.get(product_id).is_some() {
                state.favorites.toggle(product_id);
                state.render.mark(Panel::Catalog);
            }
        }
        UiEvent::AddToCart { product_id } => {
            let Some(product) = state.catalog.get(product_id) else {
                return Ok(());
            };
            // Unavailable products never reach the cart.
            if !product.in_stock {
                state.notifier.notify(Notification::error(
                    "Out of Stock",
                    format!("{} is out of stock", product.name),
                ));
                return Ok(());
            }
            state.cart.add_to_cart(product);
            state.notifier.notify(Notification::success(
                "Added to cart!",
                format!("{} has been added to your cart.", product.name),
            ));
        }

        //=================================================================================
        // Cart Dropdown
        //=================================================================================
        UiEvent::UpdateQuantity {
            product_id,
            quantity,
        } => {
            state.cart.update_quantity(product_id, quantity);
        }
        UiEvent::RemoveFromCart { product_id } => {
            state.cart.remove_from_cart(product_id);
        }
        UiEvent::ClearCart => state.cart.clear_cart(),

        UiEvent::Refresh => state.render.mark_all(),
    }
    Ok(())
}
