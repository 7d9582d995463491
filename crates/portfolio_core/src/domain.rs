//! crates/portfolio_core/src/domain.rs
//!
//! Defines the pure, core data structures for the portfolio widgets.
//! These structs are independent of any storage backend or serialization format.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Enumerated Values
//=========================================================================================

/// Returned when a textual value does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseVariantError {
    pub kind: &'static str,
    pub value: String,
}

/// The fixed set of categories a task can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskCategory {
    #[default]
    Personal,
    Work,
    Shopping,
    Health,
    Learning,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::Personal,
        TaskCategory::Work,
        TaskCategory::Shopping,
        TaskCategory::Health,
        TaskCategory::Learning,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::Personal => "personal",
            TaskCategory::Work => "work",
            TaskCategory::Shopping => "shopping",
            TaskCategory::Health => "health",
            TaskCategory::Learning => "learning",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskCategory::Personal => "Personal",
            TaskCategory::Work => "Work",
            TaskCategory::Shopping => "Shopping",
            TaskCategory::Health => "Health",
            TaskCategory::Learning => "Learning",
        }
    }
}

impl FromStr for TaskCategory {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseVariantError {
                kind: "task category",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseVariantError {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An "all, or exactly this value" filter, as offered by the widget dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    /// `"all"` selects everything; any other text must parse as `T`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

//=========================================================================================
// Tasks
//=========================================================================================

/// Opaque task identity. Fresh ids are v4 UUIDs, but any string restored from
/// storage is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single entry in the task manager.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub category: TaskCategory,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Pending and due strictly before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }

    /// Case-insensitive substring match against title or description.
    /// `needle` must already be lowercase.
    pub(crate) fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub category: TaskCategory,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: TaskCategory) -> Self {
        self.category = category;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// A partial update merged into an existing task. `None` leaves a field alone;
/// the nested options on `description` and `due_date` allow clearing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<TaskCategory>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// The counters shown above the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

//=========================================================================================
// Products and Cart
//=========================================================================================

pub type ProductId = u32;

/// An entry of the read-only product catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Present only when the item is discounted.
    pub original_price: Option<f64>,
    pub rating: f64,
    pub reviews: u32,
    pub category: String,
    pub image: String,
    pub tags: Vec<String>,
    pub in_stock: bool,
    pub featured: bool,
}

impl Product {
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some()
    }

    /// The whole-percent reduction shown on the "% OFF" badge.
    pub fn discount_percent(&self) -> Option<u32> {
        self.original_price
            .filter(|original| *original > 0.0)
            .map(|original| ((1.0 - self.price / original) * 100.0).round().max(0.0) as u32)
    }

    /// Case-insensitive substring match against name, description, or any tag.
    /// `needle` must already be lowercase.
    pub(crate) fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// One line of the shopping cart. Name, price and image are a snapshot taken
/// when the product was first added.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

//=========================================================================================
// Notifications
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationVariant {
    #[default]
    Default,
    Destructive,
}

/// A transient, user-visible message (a toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    fn product(price: f64, original_price: Option<f64>) -> Product {
        Product {
            id: 1,
            name: "Lamp".into(),
            description: "LED desk lamp".into(),
            price,
            original_price,
            rating: 4.4,
            reviews: 10,
            category: "home".into(),
            image: String::new(),
            tags: vec!["Wireless-Charging".into()],
            in_stock: true,
            featured: false,
        }
    }

    #[rstest]
    #[case("all", Selection::All)]
    #[case("work", Selection::Only(TaskCategory::Work))]
    #[case("learning", Selection::Only(TaskCategory::Learning))]
    fn parses_category_selection(#[case] input: &str, #[case] expected: Selection<TaskCategory>) {
        assert_eq!(input.parse::<Selection<TaskCategory>>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_priority() {
        let err = "urgent".parse::<Priority>().unwrap_err();
        assert_eq!(err.kind, "priority");
        assert_eq!(err.value, "urgent");
    }

    #[rstest]
    #[case(299.0, Some(399.0), Some(25))]
    #[case(89.0, Some(120.0), Some(26))]
    #[case(24.0, None, None)]
    fn computes_discount_badge(
        #[case] price: f64,
        #[case] original: Option<f64>,
        #[case] expected: Option<u32>,
    ) {
        assert_eq!(product(price, original).discount_percent(), expected);
    }

    #[test]
    fn product_text_match_covers_tags() {
        let p = product(89.0, None);
        assert!(p.matches_text("charging"));
        assert!(p.matches_text("desk"));
        assert!(!p.matches_text("chair"));
    }

    #[test]
    fn overdue_requires_pending_and_past_due() {
        let now = Utc::now();
        let mut task = Task {
            id: TaskId::generate(),
            title: "File taxes".into(),
            description: None,
            category: TaskCategory::Personal,
            priority: Priority::High,
            completed: false,
            created_at: now - Duration::days(3),
            due_date: Some(now - Duration::days(1)),
        };
        assert!(task.is_overdue(now));

        task.completed = true;
        assert!(!task.is_overdue(now));

        task.completed = false;
        task.due_date = Some(now);
        assert!(!task.is_overdue(now));
    }
}
