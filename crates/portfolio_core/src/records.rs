//! crates/portfolio_core/src/records.rs
//!
//! The persisted shape of the task collection: a JSON array of camelCase
//! records with RFC 3339 timestamps. Records are decoded into domain types
//! and validated on the way in.

use crate::domain::{Priority, Task, TaskCategory, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("stored tasks are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored task '{id}' is invalid: {reason}")]
    InvalidRecord { id: String, reason: String },
}

//=========================================================================================
// "Impure" Storage Record Struct
//=========================================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    category: String,
    priority: String,
    #[serde(default)]
    completed: bool,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_date: Option<DateTime<Utc>>,
}

impl TaskRecord {
    fn from_domain(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            category: task.category.as_str().to_string(),
            priority: task.priority.as_str().to_string(),
            completed: task.completed,
            created_at: task.created_at,
            due_date: task.due_date,
        }
    }

    fn to_domain(self) -> Result<Task, DecodeError> {
        let invalid = |reason: String| DecodeError::InvalidRecord {
            id: self.id.clone(),
            reason,
        };
        if self.title.trim().is_empty() {
            return Err(invalid("title is empty".to_string()));
        }
        let category = self.category.parse::<TaskCategory>().map_err(|e| invalid(format!("{e}")))?;
        let priority = self.priority.parse::<Priority>().map_err(|e| invalid(format!("{e}")))?;

        Ok(Task {
            id: TaskId::from(self.id),
            title: self.title,
            description: Some(self.description).filter(|d| !d.is_empty()),
            category,
            priority,
            completed: self.completed,
            created_at: self.created_at,
            due_date: self.due_date,
        })
    }
}

//=========================================================================================
// Codec
//=========================================================================================

pub fn encode_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from_domain).collect();
    serde_json::to_string(&records)
}

/// Decodes a stored collection, preserving its order. A record that breaks a
/// task invariant (blank title, unknown category or priority, repeated id)
/// invalidates the whole payload.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, DecodeError> {
    let records: Vec<TaskRecord> = serde_json::from_str(raw)?;
    let mut seen = HashSet::with_capacity(records.len());
    let mut tasks = Vec::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id.clone()) {
            return Err(DecodeError::InvalidRecord {
                id: record.id,
                reason: "duplicate id".to_string(),
            });
        }
        tasks.push(record.to_domain()?);
    }
    Ok(tasks)
}
