//! crates/portfolio_core/src/tasks.rs
//!
//! The task manager's state container. Every mutation writes the whole
//! collection back to local storage and then notifies subscribers.

use crate::domain::{NewTask, Selection, Task, TaskId, TaskPatch, TaskStats};
use crate::domain::{Priority, TaskCategory};
use crate::observer::{Observers, SubscriptionId};
use crate::ports::{Clock, LocalStorage, SystemClock};
use crate::records::{decode_tasks, encode_tasks};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key used when the host does not configure one.
pub const DEFAULT_STORAGE_KEY: &str = "portfolio-tasks";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("Task title is required")]
    EmptyTitle,
}

/// Emitted after each state-changing mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    Added(TaskId),
    Toggled { id: TaskId, completed: bool },
    Updated(TaskId),
    Removed(TaskId),
    ClearedCompleted(usize),
}

/// The search box, the two dropdowns and the "show completed" toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    pub search: String,
    pub category: Selection<TaskCategory>,
    pub priority: Selection<Priority>,
    pub show_completed: bool,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: Selection::All,
            priority: Selection::All,
            show_completed: true,
        }
    }
}

pub struct TaskStore {
    tasks: Vec<Task>,
    storage: Arc<dyn LocalStorage>,
    key: String,
    clock: Arc<dyn Clock>,
    observers: Observers<TaskEvent>,
}

impl TaskStore {
    /// Restores the store from `storage`. Unreadable state is discarded and
    /// the store starts empty.
    pub fn load(storage: Arc<dyn LocalStorage>, key: impl Into<String>) -> Self {
        Self::load_with_clock(storage, key, Arc::new(SystemClock))
    }

    pub fn load_with_clock(
        storage: Arc<dyn LocalStorage>,
        key: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let key = key.into();
        let tasks = match storage.get_item(&key) {
            Ok(Some(raw)) => match decode_tasks(&raw) {
                Ok(tasks) => {
                    info!(key = %key, count = tasks.len(), "Restored tasks from storage");
                    tasks
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding unreadable task record");
                    if let Err(e) = storage.remove_item(&key) {
                        warn!(key = %key, error = %e, "Failed to remove unreadable task record");
                    }
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!(key = %key, "No stored tasks, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read stored tasks, starting empty");
                Vec::new()
            }
        };

        Self {
            tasks,
            storage,
            key,
            clock,
            observers: Observers::new(),
        }
    }

    //=====================================================================================
    // Mutations
    //=====================================================================================

    /// Creates a task at the front of the list. Blank titles are rejected
    /// without touching state.
    pub fn add(&mut self, input: NewTask) -> Result<TaskId, TaskError> {
        if input.title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }

        let mut id = TaskId::generate();
        while self.position(&id).is_some() {
            id = TaskId::generate();
        }

        let task = Task {
            id: id.clone(),
            title: input.title,
            description: normalize_description(input.description),
            category: input.category,
            priority: input.priority,
            completed: false,
            created_at: self.clock.now(),
            due_date: input.due_date,
        };
        self.tasks.insert(0, task);
        self.commit(TaskEvent::Added(id.clone()));
        Ok(id)
    }

    /// Flips `completed`. Returns `false` when no task has this id.
    pub fn toggle_complete(&mut self, id: &TaskId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        let completed = task.completed;
        self.commit(TaskEvent::Toggled {
            id: id.clone(),
            completed,
        });
        true
    }

    /// Merges `patch` into the task. `id` and `created_at` never change, and a
    /// blank title in the patch is ignored so stored titles stay non-empty.
    /// Returns `false`, without persisting or notifying, when no task has this
    /// id or the patch leaves the task as it was.
    pub fn update(&mut self, id: &TaskId, patch: TaskPatch) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let before = self.tasks[index].clone();
        let task = &mut self.tasks[index];
        if let Some(title) = patch.title.filter(|t| !t.trim().is_empty()) {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = normalize_description(description);
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if *task == before {
            debug!(id = %id, "Update left task unchanged");
            return false;
        }
        self.commit(TaskEvent::Updated(id.clone()));
        true
    }

    pub fn remove(&mut self, id: &TaskId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.tasks.remove(index);
        self.commit(TaskEvent::Removed(id.clone()));
        true
    }

    /// Drops every completed task and returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        if removed > 0 {
            self.commit(TaskEvent::ClearedCompleted(removed));
        }
        removed
    }

    //=====================================================================================
    // Queries
    //=====================================================================================

    /// The visible subset, in stored (most-recent-first) order.
    pub fn list(&self, filter: &TaskFilter) -> Vec<&Task> {
        let needle = filter.search.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| {
                task.matches_text(&needle)
                    && filter.category.matches(&task.category)
                    && filter.priority.matches(&task.priority)
                    && (filter.show_completed || !task.completed)
            })
            .collect()
    }

    pub fn stats(&self) -> TaskStats {
        self.stats_at(self.clock.now())
    }

    pub fn stats_at(&self, now: DateTime<Utc>) -> TaskStats {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskStats {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
            overdue: self.tasks.iter().filter(|t| t.is_overdue(now)).count(),
        }
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    //=====================================================================================
    // Subscriptions
    //=====================================================================================

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&TaskEvent) + Send + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    //=====================================================================================
    // Internals
    //=====================================================================================

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    fn commit(&mut self, event: TaskEvent) {
        self.persist();
        debug!(?event, "Task store changed");
        self.observers.notify(&event);
    }

    /// Best effort: a failed write is logged and the in-memory state stays
    /// authoritative.
    fn persist(&self) {
        match encode_tasks(&self.tasks) {
            Ok(raw) => {
                if let Err(e) = self.storage.set_item(&self.key, &raw) {
                    warn!(key = %self.key, error = %e, "Failed to persist tasks");
                }
            }
            Err(e) => warn!(key = %self.key, error = %e, "Failed to encode tasks"),
        }
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use crate::ports::{PortError, PortResult};
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    struct ReadOnlyStorage;

    impl LocalStorage for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> PortResult<Option<String>> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> PortResult<()> {
            Err(PortError::Unexpected("quota exceeded".to_string()))
        }

        fn remove_item(&self, _key: &str) -> PortResult<()> {
            Ok(())
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[fixture]
    fn storage() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::new())
    }

    fn store_on(storage: &Arc<MemoryStorage>) -> TaskStore {
        TaskStore::load_with_clock(storage.clone(), "tasks", Arc::new(FixedClock(noon())))
    }

    #[rstest]
    fn add_inserts_most_recent_first(storage: Arc<MemoryStorage>) {
        let mut store = store_on(&storage);
        let first = store.add(NewTask::new("Write blog post")).unwrap();
        let second = store.add(NewTask::new("Review PR")).unwrap();

        let ids: Vec<_> = store.tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![second, first]);

        let task = &store.tasks()[0];
        assert!(!task.completed);
        assert_eq!(task.created_at, noon());
        assert_eq!(task.category, TaskCategory::Personal);
        assert_eq!(task.priority, Priority::Medium);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn add_rejects_blank_title(storage: Arc<MemoryStorage>, #[case] title: &str) {
        let mut store = store_on(&storage);
        assert_eq!(store.add(NewTask::new(title)), Err(TaskError::EmptyTitle));
        assert!(store.is_empty());
        assert_eq!(storage.get_item("tasks").unwrap(), None);
    }

    #[rstest]
    fn missing_ids_are_no_ops(storage: Arc<MemoryStorage>) {
        let mut store = store_on(&storage);
        store.add(NewTask::new("Only task")).unwrap();
        let ghost = TaskId::from("ghost");

        assert!(!store.toggle_complete(&ghost));
        assert!(!store.update(&ghost, TaskPatch::default()));
        assert!(!store.remove(&ghost));
        assert_eq!(store.len(), 1);
    }

    #[rstest]
    fn update_merges_fields_but_keeps_identity(storage: Arc<MemoryStorage>) {
        let mut store = store_on(&storage);
        let id = store
            .add(NewTask::new("Gym").description("legs").category(TaskCategory::Health))
            .unwrap();

        let due = noon() + Duration::days(2);
        assert!(store.update(
            &id,
            TaskPatch {
                title: Some("   ".into()),
                description: Some(None),
                priority: Some(Priority::High),
                due_date: Some(Some(due)),
                ..Default::default()
            }
        ));

        let task = store.get(&id).unwrap();
        assert_eq!(task.title, "Gym");
        assert_eq!(task.description, None);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category, TaskCategory::Health);
        assert_eq!(task.due_date, Some(due));
        assert_eq!(task.created_at, noon());
    }

    #[rstest]
    fn unchanged_update_is_silent(storage: Arc<MemoryStorage>) {
        let mut store = store_on(&storage);
        let id = store
            .add(NewTask::new("Stretch").priority(Priority::Low))
            .unwrap();
        let saved = storage.get_item("tasks").unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        {
            let events = events.clone();
            store.subscribe(move |e| events.lock().unwrap().push(e.clone()));
        }

        assert!(!store.update(
            &id,
            TaskPatch {
                title: Some("  ".into()),
                ..Default::default()
            }
        ));
        assert!(!store.update(
            &id,
            TaskPatch {
                title: Some("Stretch".into()),
                priority: Some(Priority::Low),
                ..Default::default()
            }
        ));
        assert!(events.lock().unwrap().is_empty());
        assert_eq!(storage.get_item("tasks").unwrap(), saved);

        assert!(store.update(
            &id,
            TaskPatch {
                title: Some("  ".into()),
                priority: Some(Priority::High),
                ..Default::default()
            }
        ));
        assert_eq!(*events.lock().unwrap(), vec![TaskEvent::Updated(id.clone())]);
        assert_eq!(store.get(&id).unwrap().title, "Stretch");
    }

    #[rstest]
    fn list_applies_every_filter(storage: Arc<MemoryStorage>) {
        let mut store = store_on(&storage);
        store
            .add(
                NewTask::new("Buy groceries")
                    .description("Milk and EGGS")
                    .category(TaskCategory::Shopping),
            )
            .unwrap();
        let report = store
            .add(
                NewTask::new("Quarterly report")
                    .category(TaskCategory::Work)
                    .priority(Priority::High),
            )
            .unwrap();
        store
            .add(
                NewTask::new("Learn Rust")
                    .category(TaskCategory::Learning)
                    .priority(Priority::High),
            )
            .unwrap();
        store.toggle_complete(&report);

        let titles = |filter: &TaskFilter| -> Vec<String> {
            store.list(filter).iter().map(|t| t.title.clone()).collect()
        };

        let by_text = TaskFilter {
            search: "eggs".into(),
            ..Default::default()
        };
        assert_eq!(titles(&by_text), vec!["Buy groceries"]);

        let high = TaskFilter {
            priority: Selection::Only(Priority::High),
            ..Default::default()
        };
        assert_eq!(titles(&high), vec!["Learn Rust", "Quarterly report"]);

        let high_pending = TaskFilter {
            show_completed: false,
            ..high.clone()
        };
        assert_eq!(titles(&high_pending), vec!["Learn Rust"]);

        let work = TaskFilter {
            category: Selection::Only(TaskCategory::Work),
            ..Default::default()
        };
        assert_eq!(titles(&work), vec!["Quarterly report"]);
        assert_eq!(store.list(&work), store.list(&work));
    }

    #[rstest]
    fn stats_count_overdue_pending_tasks(storage: Arc<MemoryStorage>) {
        let mut store = store_on(&storage);
        store
            .add(NewTask::new("Past due").due(noon() - Duration::hours(1)))
            .unwrap();
        let done = store
            .add(NewTask::new("Past due but done").due(noon() - Duration::days(1)))
            .unwrap();
        store
            .add(NewTask::new("Upcoming").due(noon() + Duration::days(1)))
            .unwrap();
        store.add(NewTask::new("No date")).unwrap();
        store.toggle_complete(&done);

        assert_eq!(
            store.stats(),
            TaskStats {
                total: 4,
                completed: 1,
                pending: 3,
                overdue: 1,
            }
        );
    }

    #[rstest]
    fn every_mutation_is_persisted_and_restored(storage: Arc<MemoryStorage>) {
        let mut store = store_on(&storage);
        let keep = store
            .add(NewTask::new("Keep").description("around").due(noon() + Duration::days(7)))
            .unwrap();
        let drop = store.add(NewTask::new("Drop")).unwrap();
        store.toggle_complete(&keep);
        store.remove(&drop);

        let restored = store_on(&storage);
        assert_eq!(restored.tasks(), store.tasks());
    }

    #[rstest]
    fn corrupted_storage_starts_empty() {
        let storage = Arc::new(MemoryStorage::with_item("tasks", "[{\"id\": oops"));
        let store = store_on(&storage);

        assert!(store.is_empty());
        assert_eq!(storage.get_item("tasks").unwrap(), None);
    }

    #[test]
    fn failed_writes_do_not_fail_mutations() {
        let mut store = TaskStore::load(Arc::new(ReadOnlyStorage), DEFAULT_STORAGE_KEY);
        let id = store.add(NewTask::new("Still here")).unwrap();
        assert!(store.toggle_complete(&id));
        assert_eq!(store.len(), 1);
    }

    #[rstest]
    fn subscribers_see_each_change(storage: Arc<MemoryStorage>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut store = store_on(&storage);
        let subscription = {
            let events = events.clone();
            store.subscribe(move |e| events.lock().unwrap().push(e.clone()))
        };

        let id = store.add(NewTask::new("Observe me")).unwrap();
        store.add(NewTask::new(" ")).unwrap_err();
        store.toggle_complete(&id);
        assert_eq!(store.clear_completed(), 1);
        assert!(store.unsubscribe(subscription));
        store.add(NewTask::new("Unseen")).unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                TaskEvent::Added(id.clone()),
                TaskEvent::Toggled {
                    id,
                    completed: true
                },
                TaskEvent::ClearedCompleted(1),
            ]
        );
    }
}
