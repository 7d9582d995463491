//! services/site/src/host/protocol.rs
//!
//! Defines the message protocol between the page's view layer and the widget
//! host. Each message is one JSON object per line.

use crate::host::views::{CartView, CatalogView, TasksView};
use portfolio_core::domain::{Notification, NotificationVariant, ProductId};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Messages Sent FROM the View Layer TO the Host
//=========================================================================================
// NOTE: enumerated values (categories, priorities, sort keys) travel as their
// lowercase names and are validated by the handler, so a bad value can be
// reported without rejecting the whole line.
//=========================================================================================

/// The user interactions the widgets can report.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// Submits the "Add New Task" form.
    AddTask {
        title: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        priority: Option<String>,
        /// `YYYY-MM-DD` from a date input, or a full RFC 3339 timestamp.
        #[serde(default)]
        due_date: Option<String>,
    },

    ToggleTask { id: String },

    /// Edits a task. Absent fields are left alone; an empty `description` or
    /// `due_date` clears it.
    UpdateTask {
        id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        priority: Option<String>,
        #[serde(default)]
        due_date: Option<String>,
    },

    DeleteTask { id: String },

    ClearCompleted,

    /// Changes the task list controls. Absent fields keep their current value.
    SetTaskFilter {
        #[serde(default)]
        search: Option<String>,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        priority: Option<String>,
        #[serde(default)]
        show_completed: Option<bool>,
    },

    /// Changes the product showcase controls. Absent fields keep their current value.
    SetCatalogQuery {
        #[serde(default)]
        search: Option<String>,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        min_price: Option<f64>,
        #[serde(default)]
        max_price: Option<f64>,
        #[serde(default)]
        sort: Option<String>,
    },

    ToggleFavorite { product_id: ProductId },

    AddToCart { product_id: ProductId },

    UpdateQuantity { product_id: ProductId, quantity: i64 },

    RemoveFromCart { product_id: ProductId },

    ClearCart,

    /// Asks for every panel to be rendered again.
    Refresh,
}

//=========================================================================================
// Messages Sent FROM the Host TO the View Layer
//=========================================================================================

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// A full re-render of one panel, or a transient message.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewUpdate {
    Tasks(TasksView),
    Catalog(CatalogView),
    Cart(CartView),
    Toast {
        title: String,
        description: String,
        variant: ToastVariant,
    },
    /// The last event could not be applied.
    Error { message: String },
}

impl From<Notification> for ViewUpdate {
    fn from(notification: Notification) -> Self {
        ViewUpdate::Toast {
            title: notification.title,
            description: notification.description,
            variant: match notification.variant {
                NotificationVariant::Default => ToastVariant::Default,
                NotificationVariant::Destructive => ToastVariant::Destructive,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_tagged_events() {
        let event: UiEvent = serde_json::from_value(json!({
            "type": "add_task",
            "title": "Buy milk",
            "category": "shopping",
            "due_date": "2024-06-30"
        }))
        .unwrap();
        assert_eq!(
            event,
            UiEvent::AddTask {
                title: "Buy milk".into(),
                description: None,
                category: Some("shopping".into()),
                priority: None,
                due_date: Some("2024-06-30".into()),
            }
        );

        let event: UiEvent = serde_json::from_str(r#"{"type":"clear_cart"}"#).unwrap();
        assert_eq!(event, UiEvent::ClearCart);

        let raw = r#"{"type":"update_quantity","product_id":1,"quantity":-1}"#;
        let event: UiEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(
            event,
            UiEvent::UpdateQuantity {
                product_id: 1,
                quantity: -1
            }
        );
    }

    #[test]
    fn encodes_toasts_with_their_variant() {
        let update = ViewUpdate::from(Notification::error("Error", "Task title is required"));
        assert_eq!(
            serde_json::to_value(update).unwrap(),
            json!({
                "type": "toast",
                "title": "Error",
                "description": "Task title is required",
                "variant": "destructive"
            })
        );
    }
}
