//! Task service: the client's only path to the document store.
//!
//! Wraps a [`DocumentStore`] with input checks, error mapping and snapshot
//! normalization. Everything the view layer receives, whether from a one-shot
//! fetch or from the change feed, has been through
//! [`normalize_snapshot`](super::view_model::normalize_snapshot): duplicates
//! dropped, then sorted by due date.
//!
//! ## Feed failures
//!
//! When the change feed reports an error, the service runs exactly one
//! [`TaskService::get_tasks`] and hands its result to the same callback. If
//! that fetch fails too, the failure is logged and the callback is not
//! called; no retry is scheduled.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Local;
//! use gigtask::db::tasks::Tasks;
//! use gigtask::libs::store::TaskStore;
//! use gigtask::libs::sync::TaskService;
//! use gigtask::libs::task::{NewTask, Priority};
//! use std::sync::Arc;
//!
//! let service = TaskService::new(Arc::new(Tasks::in_memory()?));
//! let store = TaskStore::new();
//! let _subscription = service.attach(&store, "u1")?;
//!
//! service.create_task(NewTask::new("u1", "  Pay rent ", "", Local::now(), Priority::High))?;
//! assert_eq!(store.tasks()[0].title, "Pay rent");
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::messages::Message;
use super::store::TaskStore;
use super::task::{NewTask, Task, TaskId, TaskPatch};
use super::view_model::normalize_snapshot;
use crate::api::documents::{DocumentStore, StoreError};
use crate::api::subscription::Subscription;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Failed to create task")]
    CreateFailed(#[source] StoreError),
    #[error("Failed to update task")]
    UpdateFailed(#[source] StoreError),
    #[error("Failed to delete task")]
    DeleteFailed(#[source] StoreError),
    #[error("Failed to fetch tasks")]
    FetchFailed(#[source] StoreError),
    #[error("Please enter a task title to continue.")]
    TitleRequired,
}

impl TaskError {
    /// The underlying store failure, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            TaskError::CreateFailed(e) | TaskError::UpdateFailed(e) | TaskError::DeleteFailed(e) | TaskError::FetchFailed(e) => Some(e),
            TaskError::TitleRequired => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.store_error(), Some(StoreError::NotFound(_)))
    }
}

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn DocumentStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        TaskService { store }
    }

    /// Stores a new task with trimmed title and description.
    ///
    /// # Errors
    ///
    /// [`TaskError::TitleRequired`] when the trimmed title is empty, otherwise
    /// [`TaskError::CreateFailed`] wrapping the store failure.
    pub fn create_task(&self, mut task: NewTask) -> Result<TaskId, TaskError> {
        task.title = task.title.trim().to_string();
        task.description = task.description.trim().to_string();
        if task.title.is_empty() {
            return Err(TaskError::TitleRequired);
        }

        tracing::info!(title = %task.title, "creating task");
        match self.store.create(&task) {
            Ok(id) => {
                tracing::info!(task_id = %id, "task created");
                Ok(id)
            }
            Err(e) => {
                tracing::error!(error = %e, "error creating task");
                Err(TaskError::CreateFailed(e))
            }
        }
    }

    /// Applies a partial update; `updated_at` is refreshed by the store.
    pub fn update_task(&self, id: &TaskId, patch: TaskPatch) -> Result<(), TaskError> {
        let mut patch = patch;
        if let Some(title) = patch.title.take() {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(TaskError::TitleRequired);
            }
            patch.title = Some(title);
        }
        if let Some(description) = patch.description.take() {
            patch.description = Some(description.trim().to_string());
        }

        tracing::info!(task_id = %id, "updating task");
        self.store.update(id, &patch).map_err(|e| {
            tracing::error!(task_id = %id, error = %e, "error updating task");
            TaskError::UpdateFailed(e)
        })
    }

    pub fn delete_task(&self, id: &TaskId) -> Result<(), TaskError> {
        tracing::info!(task_id = %id, "deleting task");
        self.store.delete(id).map_err(|e| {
            tracing::error!(task_id = %id, error = %e, "error deleting task");
            TaskError::DeleteFailed(e)
        })
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle_completed(&self, task: &Task) -> Result<bool, TaskError> {
        let completed = !task.completed;
        self.update_task(&task.id, TaskPatch::default().completed(completed))?;
        Ok(completed)
    }

    /// One-shot fetch of every task of `user_id`, normalized.
    pub fn get_tasks(&self, user_id: &str) -> Result<Vec<Task>, TaskError> {
        fetch_normalized(self.store.as_ref(), user_id)
    }

    /// Streams normalized task lists of `user_id` into `callback`.
    ///
    /// The first list arrives before this returns. When the store cannot open
    /// the feed at all, a single fetch result is delivered instead and the
    /// returned subscription is inert.
    pub fn subscribe_to_tasks<F>(&self, user_id: &str, callback: F) -> Result<Subscription, TaskError>
    where
        F: FnMut(Vec<Task>) + Send + 'static,
    {
        tracing::debug!(user_id, "setting up task subscription");
        let callback = Arc::new(Mutex::new(callback));

        let on_snapshot = {
            let callback = callback.clone();
            Box::new(move |tasks: &[Task]| {
                let tasks = normalize_snapshot(tasks.to_vec());
                tracing::debug!("{}", Message::SnapshotReceived(tasks.len()));
                (*callback.lock())(tasks);
            })
        };
        let on_error = {
            let callback = callback.clone();
            let store = self.store.clone();
            let user_id = user_id.to_string();
            Box::new(move |error: &StoreError| fall_back(store.as_ref(), &user_id, error, &callback))
        };

        match self.store.subscribe(user_id, on_snapshot, on_error) {
            Ok(subscription) => Ok(subscription),
            Err(e) => {
                tracing::warn!("{}", Message::SubscriptionFallback(e.to_string()));
                let tasks = fetch_normalized(self.store.as_ref(), user_id)?;
                (*callback.lock())(tasks);
                Ok(Subscription::empty())
            }
        }
    }

    /// Keeps `store` in sync with the tasks of `user_id`.
    ///
    /// Marks the store as loading until the first list arrives.
    pub fn attach(&self, store: &TaskStore, user_id: &str) -> Result<Subscription, TaskError> {
        store.set_loading(true);
        let target = store.clone();
        let result = self.subscribe_to_tasks(user_id, move |tasks| {
            target.set_tasks(tasks);
            if target.is_loading() {
                target.set_loading(false);
            }
        });
        if result.is_err() {
            store.set_loading(false);
        }
        result
    }
}

fn fetch_normalized(store: &dyn DocumentStore, user_id: &str) -> Result<Vec<Task>, TaskError> {
    tracing::debug!(user_id, "fetching tasks");
    match store.fetch_all(user_id) {
        Ok(tasks) => {
            let tasks = normalize_snapshot(tasks);
            tracing::debug!(count = tasks.len(), "processed and sorted tasks");
            Ok(tasks)
        }
        Err(e) => {
            tracing::error!(user_id, error = %e, "error fetching tasks");
            Err(TaskError::FetchFailed(e))
        }
    }
}

fn fall_back<F>(store: &dyn DocumentStore, user_id: &str, error: &StoreError, callback: &Mutex<F>)
where
    F: FnMut(Vec<Task>),
{
    tracing::error!("{}", Message::SubscriptionFallback(error.to_string()));
    match fetch_normalized(store, user_id) {
        Ok(tasks) => (*callback.lock())(tasks),
        Err(e) => tracing::error!("{}", Message::SubscriptionFallbackFailed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tasks::Tasks;
    use crate::libs::task::Priority;
    use chrono::{Local, TimeZone};

    fn service() -> TaskService {
        TaskService::new(Arc::new(Tasks::in_memory().unwrap()))
    }

    fn new_task(title: &str, day: u32) -> NewTask {
        let due = Local.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap();
        NewTask::new("u1", title, " notes ", due, Priority::Medium)
    }

    #[test]
    fn test_create_task_trims_and_requires_title() {
        let service = service();
        assert!(matches!(service.create_task(new_task("   ", 10)), Err(TaskError::TitleRequired)));

        service.create_task(new_task("  Report  ", 10)).unwrap();
        let tasks = service.get_tasks("u1").unwrap();
        assert_eq!(tasks[0].title, "Report");
        assert_eq!(tasks[0].description, "notes");
    }

    #[test]
    fn test_update_rejects_blank_title_and_maps_not_found() {
        let service = service();
        let id = service.create_task(new_task("Report", 10)).unwrap();

        assert!(matches!(service.update_task(&id, TaskPatch::default().title(" ")), Err(TaskError::TitleRequired)));
        let missing = service.update_task(&TaskId::from("missing"), TaskPatch::default().completed(true)).unwrap_err();
        assert!(missing.is_not_found());
        assert!(matches!(service.delete_task(&TaskId::from("missing")), Err(TaskError::DeleteFailed(_))));
    }

    #[test]
    fn test_get_tasks_is_sorted_by_due_date() {
        let service = service();
        service.create_task(new_task("later", 12)).unwrap();
        service.create_task(new_task("sooner", 10)).unwrap();

        let titles: Vec<String> = service.get_tasks("u1").unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["sooner", "later"]);
    }

    #[test]
    fn test_toggle_completed() {
        let service = service();
        service.create_task(new_task("Report", 10)).unwrap();
        let task = service.get_tasks("u1").unwrap().remove(0);

        assert!(service.toggle_completed(&task).unwrap());
        assert!(service.get_tasks("u1").unwrap()[0].completed);
    }

    #[test]
    fn test_attach_fills_store_and_clears_loading() {
        let service = service();
        service.create_task(new_task("Report", 10)).unwrap();
        let store = TaskStore::new();

        let subscription = service.attach(&store, "u1").unwrap();
        assert!(!store.is_loading());
        assert_eq!(store.tasks().len(), 1);

        service.create_task(new_task("Slides", 9)).unwrap();
        let titles: Vec<String> = store.tasks().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Slides", "Report"]);

        drop(subscription);
        service.create_task(new_task("Ignored", 11)).unwrap();
        assert_eq!(store.tasks().len(), 2);
    }
}
