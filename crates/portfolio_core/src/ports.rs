//! crates/portfolio_core/src/ports.rs
//!
//! Defines the service contracts (traits) the stores depend on.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! stores independent of where state is persisted or how messages are shown.

use crate::domain::Notification;
use chrono::{DateTime, Utc};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable key-value storage with the semantics of a browser's local storage.
pub trait LocalStorage: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    fn get_item(&self, key: &str) -> PortResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> PortResult<()>;

    fn remove_item(&self, key: &str) -> PortResult<()>;
}

/// The toast surface for user-visible success and error messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
