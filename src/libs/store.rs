//! Observable in-process task state.
//!
//! [`TaskStore`] is the single client-side copy of the signed-in user's
//! tasks together with the active filter and a loading flag. It is a cheap,
//! cloneable handle: the session writes snapshots into it, views read it and
//! subscribe to changes.
//!
//! Every mutation publishes the complete new [`StoreState`]. Mutations are
//! serialized with their notification, so observers see states in the order
//! they were written.
//!
//! ## Usage
//!
//! ```rust
//! use gigtask::libs::filter::{FilterPatch, StatusFilter};
//! use gigtask::libs::store::TaskStore;
//!
//! let store = TaskStore::new();
//! let _subscription = store.subscribe(|state| println!("{} tasks", state.tasks.len()));
//! store.set_filter(FilterPatch::default().status(StatusFilter::Incomplete));
//! assert_eq!(store.snapshot().filter.status, StatusFilter::Incomplete);
//! ```

use super::filter::{Filter, FilterPatch};
use super::task::{Task, TaskId, TaskPatch};
use crate::api::subscription::{Subscribers, Subscription};
use parking_lot::{ReentrantMutex, RwLock};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub tasks: Vec<Task>,
    pub filter: Filter,
    pub loading: bool,
}

struct Inner {
    state: RwLock<StoreState>,
    // Reentrant so an observer may write back into the store.
    publish: ReentrantMutex<()>,
    observers: Subscribers<StoreState>,
}

#[derive(Clone)]
pub struct TaskStore {
    inner: Arc<Inner>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::with_filter(Filter::default())
    }

    /// Store whose filter starts from `filter` (e.g. the configured default).
    pub fn with_filter(filter: Filter) -> Self {
        TaskStore {
            inner: Arc::new(Inner {
                state: RwLock::new(StoreState {
                    filter,
                    ..StoreState::default()
                }),
                publish: ReentrantMutex::new(()),
                observers: Subscribers::new(),
            }),
        }
    }

    fn mutate<F>(&self, change: F)
    where
        F: FnOnce(&mut StoreState),
    {
        let _publishing = self.inner.publish.lock();
        let state = {
            let mut state = self.inner.state.write();
            change(&mut state);
            state.clone()
        };
        self.inner.observers.notify(&state);
    }

    /// Replaces the whole task list; the latest call wins.
    pub fn set_tasks(&self, tasks: Vec<Task>) {
        self.mutate(|state| state.tasks = tasks);
    }

    pub fn add_task(&self, task: Task) {
        self.mutate(|state| state.tasks.push(task));
    }

    /// Merges `patch` into the task with `id`; unknown ids are ignored.
    pub fn update_task(&self, id: &TaskId, patch: &TaskPatch) {
        self.mutate(|state| {
            for task in state.tasks.iter_mut().filter(|task| &task.id == id) {
                task.apply(patch);
            }
        });
    }

    pub fn delete_task(&self, id: &TaskId) {
        self.mutate(|state| state.tasks.retain(|task| &task.id != id));
    }

    pub fn set_loading(&self, loading: bool) {
        self.mutate(|state| state.loading = loading);
    }

    pub fn set_filter(&self, patch: FilterPatch) {
        self.mutate(|state| state.filter.apply(patch));
    }

    /// Empties the task list and marks the store idle.
    pub fn clear(&self) {
        self.mutate(|state| {
            state.tasks.clear();
            state.loading = false;
        });
    }

    pub fn snapshot(&self) -> StoreState {
        self.inner.state.read().clone()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.inner.state.read().tasks.clone()
    }

    pub fn filter(&self) -> Filter {
        self.inner.state.read().filter
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.read().loading
    }

    /// Calls `observer` with the new state after every mutation.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: FnMut(&StoreState) + Send + 'static,
    {
        self.inner.observers.subscribe(observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::filter::{PriorityFilter, StatusFilter};
    use crate::libs::task::{NewTask, Priority};
    use chrono::{Local, TimeZone};
    use parking_lot::Mutex;

    fn task(id: &str, title: &str) -> Task {
        let due = Local.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        NewTask::new("u1", title, "", due, Priority::Low).into_task(TaskId::from(id), due)
    }

    #[test]
    fn test_mutations() {
        let store = TaskStore::new();
        store.set_tasks(vec![task("a", "A"), task("b", "B")]);
        store.add_task(task("c", "C"));
        store.update_task(&TaskId::from("b"), &TaskPatch::default().title("B2").completed(true));
        store.update_task(&TaskId::from("missing"), &TaskPatch::default().title("nope"));
        store.delete_task(&TaskId::from("a"));

        let tasks = store.tasks();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["B2", "C"]);
        assert!(tasks[0].completed);
    }

    #[test]
    fn test_set_filter_merges() {
        let store = TaskStore::new();
        store.set_filter(FilterPatch::default().priority(PriorityFilter::High));
        store.set_filter(FilterPatch::default().status(StatusFilter::Completed));

        assert_eq!(store.filter(), Filter::new(PriorityFilter::High, StatusFilter::Completed));
    }

    #[test]
    fn test_observers_get_every_state_until_released() {
        let store = TaskStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut subscription = store.subscribe(move |state: &StoreState| sink.lock().push((state.tasks.len(), state.loading)));

        store.set_loading(true);
        store.set_tasks(vec![task("a", "A")]);
        store.set_loading(false);
        subscription.unsubscribe();
        store.clear();

        assert_eq!(*seen.lock(), vec![(0, true), (1, true), (1, false)]);
    }

    #[test]
    fn test_observer_may_write_back() {
        let store = TaskStore::new();
        let writer = store.clone();
        let _subscription = store.subscribe(move |state: &StoreState| {
            if state.loading && !state.tasks.is_empty() {
                writer.set_loading(false);
            }
        });

        store.set_loading(true);
        store.set_tasks(vec![task("a", "A")]);
        assert!(!store.is_loading());
    }
}
