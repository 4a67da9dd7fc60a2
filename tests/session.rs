#[cfg(test)]
mod tests {
    use chrono::Local;
    use gigtask::api::{DocumentStore, ErrorCallback, IdentityProvider, SnapshotCallback, StoreError, Subscription};
    use gigtask::db::accounts::Accounts;
    use gigtask::db::tasks::Tasks;
    use gigtask::libs::session::TaskSession;
    use gigtask::libs::store::TaskStore;
    use gigtask::libs::sync::TaskService;
    use gigtask::libs::task::{NewTask, Priority, Task, TaskId, TaskPatch};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Task store that can be taken offline: reads and subscriptions fail while down.
    struct Outage {
        tasks: Arc<Tasks>,
        down: AtomicBool,
    }

    impl Outage {
        fn check(&self) -> Result<(), StoreError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(StoreError::Transport("backend unavailable".to_string()));
            }
            Ok(())
        }
    }

    impl DocumentStore for Outage {
        fn create(&self, task: &NewTask) -> Result<TaskId, StoreError> {
            self.tasks.create(task)
        }

        fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), StoreError> {
            self.tasks.update(id, patch)
        }

        fn delete(&self, id: &TaskId) -> Result<(), StoreError> {
            self.tasks.delete(id)
        }

        fn fetch_all(&self, user_id: &str) -> Result<Vec<Task>, StoreError> {
            self.check()?;
            self.tasks.fetch_all(user_id)
        }

        fn subscribe(&self, user_id: &str, on_snapshot: SnapshotCallback, on_error: ErrorCallback) -> Result<Subscription, StoreError> {
            self.check()?;
            self.tasks.subscribe(user_id, on_snapshot, on_error)
        }
    }

    struct SessionTestContext {
        _temp_dir: TempDir,
        identity: Arc<Accounts>,
        tasks: Arc<Tasks>,
        store: TaskStore,
    }

    impl SessionTestContext {
        fn start(&self) -> TaskSession {
            TaskSession::start(self.identity.clone(), TaskService::new(self.tasks.clone()), self.store.clone())
        }

        fn add(&self, user_id: &str, title: &str) {
            self.tasks.create(&NewTask::new(user_id, title, "", Local::now(), Priority::Medium)).unwrap();
        }

        fn titles(&self) -> Vec<String> {
            self.store.tasks().into_iter().map(|t| t.title).collect()
        }
    }

    impl TestContext for SessionTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("gigtask.db");
            let identity = Arc::new(Accounts::open(&db_path, temp_dir.path().join("session.json")).unwrap());
            let tasks = Arc::new(Tasks::open(&db_path).unwrap());
            SessionTestContext {
                _temp_dir: temp_dir,
                identity,
                tasks,
                store: TaskStore::new(),
            }
        }
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_sign_in_attaches_and_sign_out_releases(ctx: &mut SessionTestContext) {
        let ann = ctx.identity.sign_up("ann@example.com", "secret1").unwrap();
        ctx.identity.sign_out().unwrap();
        ctx.add(&ann.id, "Report");

        let session = ctx.start();
        assert!(!session.is_attached());
        assert!(ctx.titles().is_empty());

        ctx.identity.sign_in("ann@example.com", "secret1").unwrap();
        assert!(session.is_attached());
        assert_eq!(ctx.titles(), vec!["Report"]);

        ctx.add(&ann.id, "Slides");
        assert_eq!(ctx.titles().len(), 2);

        ctx.identity.sign_out().unwrap();
        assert!(!session.is_attached());
        assert!(ctx.titles().is_empty());

        ctx.add(&ann.id, "After sign-out");
        assert!(ctx.titles().is_empty());
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_switching_users_never_mixes_tasks(ctx: &mut SessionTestContext) {
        let ann = ctx.identity.sign_up("ann@example.com", "secret1").unwrap();
        let bob = ctx.identity.sign_up("bob@example.com", "secret2").unwrap();
        ctx.add(&ann.id, "Ann's task");
        ctx.add(&bob.id, "Bob's task");

        let session = ctx.start();
        assert_eq!(session.user().map(|u| u.id), Some(bob.id.clone()));
        assert_eq!(ctx.titles(), vec!["Bob's task"]);

        ctx.identity.sign_in("ann@example.com", "secret1").unwrap();
        assert_eq!(ctx.titles(), vec!["Ann's task"]);

        ctx.add(&bob.id, "Bob again");
        assert_eq!(ctx.titles(), vec!["Ann's task"]);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_failed_attach_is_retried_on_next_sign_in(ctx: &mut SessionTestContext) {
        let ann = ctx.identity.sign_up("ann@example.com", "secret1").unwrap();
        ctx.add(&ann.id, "Report");

        let backend = Arc::new(Outage {
            tasks: ctx.tasks.clone(),
            down: AtomicBool::new(true),
        });
        let session = TaskSession::start(ctx.identity.clone(), TaskService::new(backend.clone()), ctx.store.clone());
        assert!(!session.is_attached());
        assert!(!ctx.store.is_loading());
        assert!(ctx.titles().is_empty());

        backend.down.store(false, Ordering::SeqCst);
        ctx.identity.sign_in("ann@example.com", "secret1").unwrap();

        assert!(session.is_attached());
        assert_eq!(session.user().map(|u| u.id), Some(ann.id.clone()));
        assert_eq!(ctx.titles(), vec!["Report"]);

        ctx.add(&ann.id, "Slides");
        assert_eq!(ctx.titles().len(), 2);
    }

    #[test_context(SessionTestContext)]
    #[test]
    fn test_dropping_session_releases_everything(ctx: &mut SessionTestContext) {
        let ann = ctx.identity.sign_up("ann@example.com", "secret1").unwrap();
        let session = ctx.start();
        ctx.add(&ann.id, "Report");
        assert_eq!(ctx.titles(), vec!["Report"]);

        drop(session);
        assert!(ctx.titles().is_empty());

        ctx.add(&ann.id, "Unseen");
        ctx.identity.sign_out().unwrap();
        ctx.identity.sign_in("ann@example.com", "secret1").unwrap();
        assert!(ctx.titles().is_empty());
    }
}
