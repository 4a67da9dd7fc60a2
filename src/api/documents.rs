//! Document store capability: persistence and change feed for tasks.
//!
//! The store owns the authoritative task list. Each user's tasks are read
//! either with a one-shot [`DocumentStore::fetch_all`] or through a
//! subscription that pushes the full list on every change.

use super::subscription::Subscription;
use crate::libs::task::{NewTask, Task, TaskId, TaskPatch};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    NotFound(TaskId),
    #[error("storage backend error: {0}")]
    Backend(#[from] rusqlite::Error),
    #[error("change feed error: {0}")]
    Transport(String),
}

/// Receives the full task list of a user. Records may repeat an id.
pub type SnapshotCallback = Box<dyn FnMut(&[Task]) + Send>;

/// Receives errors raised by the change feed after subscribing.
pub type ErrorCallback = Box<dyn FnMut(&StoreError) + Send>;

pub trait DocumentStore: Send + Sync {
    /// Stores a new task and returns its id.
    fn create(&self, task: &NewTask) -> Result<TaskId, StoreError>;

    /// Merges `patch` into the task and refreshes its `updated_at`.
    fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError>;

    fn delete(&self, id: &TaskId) -> Result<(), StoreError>;

    /// All tasks owned by `user_id`, in storage order.
    fn fetch_all(&self, user_id: &str) -> Result<Vec<Task>, StoreError>;

    /// Pushes the full task list of `user_id` now and after every change.
    ///
    /// Dropping the returned [`Subscription`] stops both callbacks.
    fn subscribe(&self, user_id: &str, on_snapshot: SnapshotCallback, on_error: ErrorCallback) -> Result<Subscription, StoreError>;
}
