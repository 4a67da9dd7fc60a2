//! SQLite-backed task document store with a per-user change feed.
//!
//! Every mutation re-reads the owner's task list and pushes it to that
//! user's subscribers, so a subscriber always holds a full, authoritative
//! snapshot rather than a delta.
//!
//! ## Ordering
//!
//! Snapshots carry the store version they were read at. A subscriber never
//! receives a snapshot older than one it has already seen, even when a
//! mutation races with the initial read of a new subscription.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Local;
//! use gigtask::api::DocumentStore;
//! use gigtask::db::tasks::Tasks;
//! use gigtask::libs::task::{NewTask, Priority};
//!
//! let store = Tasks::in_memory()?;
//! let id = store.create(&NewTask::new("u1", "Review PR", "", Local::now(), Priority::High))?;
//! assert_eq!(store.fetch_all("u1")?[0].id, id);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::db::Db;
use crate::api::documents::{DocumentStore, ErrorCallback, SnapshotCallback, StoreError};
use crate::api::subscription::{Subscribers, Subscription};
use crate::libs::task::{NewTask, Priority, Task, TaskId, TaskPatch};
use anyhow::Result;
use chrono::Local;
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

const INSERT_TASK: &str = "INSERT INTO tasks (id, user_id, title, description, due_date, priority, completed, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const UPDATE_TASK: &str = "UPDATE tasks SET title = ?2, description = ?3, due_date = ?4, priority = ?5, completed = ?6, updated_at = ?7 WHERE id = ?1";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const SELECT_TASK: &str = "SELECT id, user_id, title, description, due_date, priority, completed, created_at, updated_at FROM tasks WHERE id = ?1";
const SELECT_USER_TASKS: &str =
    "SELECT id, user_id, title, description, due_date, priority, completed, created_at, updated_at FROM tasks WHERE user_id = ?1 ORDER BY rowid";

#[derive(Debug, Clone)]
enum FeedEvent {
    Snapshot { version: u64, tasks: Vec<Task> },
    Failure(String),
}

pub struct Tasks {
    conn: Mutex<Connection>,
    // Bumped under the connection lock on every write.
    version: AtomicU64,
    // SQLite `data_version` at the last refresh; moves when another connection commits.
    data_version: AtomicI64,
    feeds: Mutex<HashMap<String, Subscribers<FeedEvent>>>,
}

impl Tasks {
    /// Opens the task store in the configured database.
    pub fn new() -> Result<Tasks> {
        Ok(Self::from_db(Db::new()?))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Tasks> {
        Ok(Self::from_db(Db::open(path)?))
    }

    pub fn in_memory() -> Result<Tasks> {
        Ok(Self::from_db(Db::in_memory()?))
    }

    fn from_db(db: Db) -> Tasks {
        let data_version = read_data_version(&db.conn).unwrap_or_default();
        Tasks {
            conn: Mutex::new(db.conn),
            version: AtomicU64::new(0),
            data_version: AtomicI64::new(data_version),
            feeds: Mutex::new(HashMap::new()),
        }
    }

    /// Picks up writes made by other connections to the same database file.
    ///
    /// Returns `true` and pushes fresh snapshots to every open feed when
    /// something changed since the previous call.
    pub fn refresh(&self) -> Result<bool, StoreError> {
        let changed = {
            let conn = self.conn.lock();
            let current = read_data_version(&conn)?;
            let changed = self.data_version.swap(current, Ordering::AcqRel) != current;
            if changed {
                self.bump_version();
            }
            changed
        };

        if changed {
            let users: Vec<String> = {
                let mut feeds = self.feeds.lock();
                feeds.retain(|_, feed| !feed.is_idle());
                feeds.keys().cloned().collect()
            };
            tracing::debug!(feeds = users.len(), "database changed externally");
            for user_id in users {
                self.publish(&user_id);
            }
        }
        Ok(changed)
    }

    pub fn get(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        let conn = self.conn.lock();
        Ok(conn.query_row(SELECT_TASK, params![id.as_str()], task_from_row).optional()?)
    }

    fn read_snapshot(&self, user_id: &str) -> Result<(u64, Vec<Task>), StoreError> {
        let conn = self.conn.lock();
        let version = self.version.load(Ordering::Acquire);
        Ok((version, select_user_tasks(&conn, user_id)?))
    }

    fn bump_version(&self) {
        self.version.fetch_add(1, Ordering::AcqRel);
    }

    /// Pushes the current task list of `user_id` to its subscribers.
    fn publish(&self, user_id: &str) {
        let feed = {
            let mut feeds = self.feeds.lock();
            match feeds.get(user_id) {
                Some(feed) if feed.is_idle() => {
                    feeds.remove(user_id);
                    return;
                }
                Some(feed) => feed.clone(),
                None => return,
            }
        };
        let event = match self.read_snapshot(user_id) {
            Ok((version, tasks)) => FeedEvent::Snapshot { version, tasks },
            Err(e) => {
                tracing::error!(user_id, error = %e, "failed to read snapshot for change feed");
                FeedEvent::Failure(e.to_string())
            }
        };
        feed.notify(&event);
    }
}

fn read_data_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA data_version", [], |row| row.get(0))
}

fn select_user_tasks(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<Task>> {
    let mut stmt = conn.prepare_cached(SELECT_USER_TASKS)?;
    let tasks = stmt.query_map(params![user_id], task_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

fn task_from_row(row: &Row) -> rusqlite::Result<Task> {
    let priority: String = row.get(5)?;
    let priority = priority
        .parse::<Priority>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(Task {
        id: TaskId::new(row.get::<_, String>(0)?),
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        due_date: row.get(4)?,
        priority,
        completed: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl DocumentStore for Tasks {
    fn create(&self, task: &NewTask) -> Result<TaskId, StoreError> {
        let id = TaskId::generate();
        let stored = task.clone().into_task(id.clone(), Local::now());
        {
            let conn = self.conn.lock();
            conn.execute(
                INSERT_TASK,
                params![
                    stored.id.as_str(),
                    stored.user_id,
                    stored.title,
                    stored.description,
                    stored.due_date,
                    stored.priority.as_str(),
                    stored.completed,
                    stored.created_at,
                    stored.updated_at
                ],
            )?;
            self.bump_version();
        }

        self.publish(&stored.user_id);
        Ok(id)
    }

    fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
        let user_id = {
            let conn = self.conn.lock();
            let mut task = conn
                .query_row(SELECT_TASK, params![id.as_str()], task_from_row)
                .optional()?
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            task.apply(patch);
            task.updated_at = Local::now();
            conn.execute(
                UPDATE_TASK,
                params![
                    task.id.as_str(),
                    task.title,
                    task.description,
                    task.due_date,
                    task.priority.as_str(),
                    task.completed,
                    task.updated_at
                ],
            )?;
            self.bump_version();
            task.user_id
        };

        self.publish(&user_id);
        Ok(())
    }

    fn delete(&self, id: &TaskId) -> Result<(), StoreError> {
        let user_id = {
            let conn = self.conn.lock();
            let user_id: String = conn
                .query_row("SELECT user_id FROM tasks WHERE id = ?1", params![id.as_str()], |row| row.get(0))
                .optional()?
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            conn.execute(DELETE_TASK, params![id.as_str()])?;
            self.bump_version();
            user_id
        };

        self.publish(&user_id);
        Ok(())
    }

    fn fetch_all(&self, user_id: &str) -> Result<Vec<Task>, StoreError> {
        Ok(self.read_snapshot(user_id)?.1)
    }

    fn subscribe(&self, user_id: &str, mut on_snapshot: SnapshotCallback, mut on_error: ErrorCallback) -> Result<Subscription, StoreError> {
        let feed = self.feeds.lock().entry(user_id.to_string()).or_default().clone();

        let mut last_seen: Option<u64> = None;
        let initial = || self.read_snapshot(user_id).map(|(version, tasks)| FeedEvent::Snapshot { version, tasks });
        feed.subscribe_with(initial, move |event: &FeedEvent| match event {
            FeedEvent::Snapshot { version, tasks } => {
                if last_seen.is_some_and(|seen| *version <= seen) {
                    return;
                }
                last_seen = Some(*version);
                on_snapshot(tasks);
            }
            FeedEvent::Failure(message) => on_error(&StoreError::Transport(message.clone())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn new_task(user: &str, title: &str, day: u32) -> NewTask {
        let due = Local.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap();
        NewTask::new(user, title, "", due, Priority::Medium)
    }

    #[test]
    fn test_fetch_is_scoped_to_user() {
        let store = Tasks::in_memory().unwrap();
        store.create(&new_task("alice", "A", 10)).unwrap();
        store.create(&new_task("bob", "B", 10)).unwrap();

        let tasks = store.fetch_all("alice").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "A");
    }

    #[test]
    fn test_update_unknown_task_is_not_found() {
        let store = Tasks::in_memory().unwrap();
        let err = store.update(&TaskId::from("nope"), &TaskPatch::default().completed(true)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(matches!(store.delete(&TaskId::from("nope")), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_subscription_receives_initial_and_changed_snapshots() {
        let store = Tasks::in_memory().unwrap();
        store.create(&new_task("alice", "first", 10)).unwrap();

        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = counts.clone();
        let subscription = store
            .subscribe("alice", Box::new(move |tasks: &[Task]| sink.lock().push(tasks.len())), Box::new(|_: &StoreError| {}))
            .unwrap();

        let id = store.create(&new_task("alice", "second", 11)).unwrap();
        store.create(&new_task("bob", "other user", 11)).unwrap();
        store.delete(&id).unwrap();
        drop(subscription);
        store.create(&new_task("alice", "after release", 12)).unwrap();

        assert_eq!(*counts.lock(), vec![1, 2, 1]);
    }

    #[test]
    fn test_refresh_publishes_writes_from_other_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gigtask.db");
        let watcher = Tasks::open(&path).unwrap();
        let writer = Tasks::open(&path).unwrap();
        watcher.refresh().unwrap();

        let counts = Arc::new(Mutex::new(Vec::new()));
        let sink = counts.clone();
        let _subscription = watcher
            .subscribe("alice", Box::new(move |tasks: &[Task]| sink.lock().push(tasks.len())), Box::new(|_: &StoreError| {}))
            .unwrap();

        assert!(!watcher.refresh().unwrap());
        writer.create(&new_task("alice", "from elsewhere", 10)).unwrap();
        assert!(watcher.refresh().unwrap());
        assert!(!watcher.refresh().unwrap());

        assert_eq!(*counts.lock(), vec![0, 1]);
    }

    #[test]
    fn test_released_feeds_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gigtask.db");
        let watcher = Tasks::open(&path).unwrap();
        let writer = Tasks::open(&path).unwrap();
        watcher.refresh().unwrap();

        let listen = |user: &str| {
            watcher
                .subscribe(user, Box::new(|_: &[Task]| {}), Box::new(|_: &StoreError| {}))
                .unwrap()
        };
        let _alice = listen("alice");
        drop(listen("bob"));
        drop(listen("carol"));
        assert_eq!(watcher.feeds.lock().len(), 3);

        watcher.create(&new_task("carol", "local write", 10)).unwrap();
        assert!(!watcher.feeds.lock().contains_key("carol"));

        writer.create(&new_task("alice", "from elsewhere", 10)).unwrap();
        assert!(watcher.refresh().unwrap());
        let users: Vec<String> = watcher.feeds.lock().keys().cloned().collect();
        assert_eq!(users, vec!["alice"]);
    }

    #[test]
    fn test_update_preserves_created_at_and_round_trips_dates() {
        let store = Tasks::in_memory().unwrap();
        let new = new_task("alice", "Report", 10);
        let id = store.create(&new).unwrap();
        let before = store.get(&id).unwrap().unwrap();

        store.update(&id, &TaskPatch::default().title("Final report").completed(true)).unwrap();
        let after = store.get(&id).unwrap().unwrap();

        assert_eq!(after.title, "Final report");
        assert!(after.completed);
        assert_eq!(after.due_date, new.due_date);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
    }
}
