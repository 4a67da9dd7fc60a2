//! Ties the task subscription to the signed-in user.
//!
//! A [`TaskSession`] follows the identity provider's auth state. Whenever the
//! user changes, the previous task subscription is released first and the
//! store emptied, then a subscription for the new user is attached. After
//! sign-out no snapshot of the old user can reach the store.
//!
//! ## Usage
//!
//! ```rust
//! use gigtask::api::IdentityProvider;
//! use gigtask::db::{accounts::Accounts, tasks::Tasks};
//! use gigtask::libs::{session::TaskSession, store::TaskStore, sync::TaskService};
//! use std::sync::Arc;
//!
//! let dir = tempfile::tempdir()?;
//! let identity = Arc::new(Accounts::in_memory(dir.path().join("session.json"))?);
//! let service = TaskService::new(Arc::new(Tasks::in_memory()?));
//! let session = TaskSession::start(identity.clone(), service, TaskStore::new());
//!
//! identity.sign_up("ann@example.com", "secret1")?;
//! assert!(session.is_attached());
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::messages::Message;
use super::store::TaskStore;
use super::sync::TaskService;
use crate::api::identity::{IdentityProvider, User};
use crate::api::subscription::Subscription;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct Attachment {
    user: Option<User>,
    tasks: Option<Subscription>,
}

impl Attachment {
    fn release(&mut self, store: &TaskStore) {
        if let Some(mut subscription) = self.tasks.take() {
            subscription.unsubscribe();
            tracing::debug!("{}", Message::SessionReleased);
        }
        self.user = None;
        store.clear();
    }

    fn follow(&mut self, user: &Option<User>, service: &TaskService, store: &TaskStore) {
        // A user whose attach failed is not recorded, so the next auth event retries.
        let same_user = match (&self.user, user) {
            (Some(current), Some(next)) => current.id == next.id && self.is_live(),
            (None, None) => true,
            _ => false,
        };
        if same_user {
            return;
        }

        self.release(store);
        let Some(user) = user else {
            return;
        };

        match service.attach(store, &user.id) {
            Ok(subscription) => {
                tracing::debug!("{}", Message::SessionAttached(user.id.clone()));
                self.tasks = Some(subscription);
                self.user = Some(user.clone());
            }
            Err(e) => tracing::error!(user_id = %user.id, error = %e, "could not attach task subscription"),
        }
    }

    fn is_live(&self) -> bool {
        self.tasks.as_ref().is_some_and(Subscription::is_active)
    }
}

pub struct TaskSession {
    store: TaskStore,
    attachment: Arc<Mutex<Attachment>>,
    auth: Subscription,
}

impl TaskSession {
    /// Starts following `identity`; the current user, if any, is attached
    /// before this returns.
    pub fn start(identity: Arc<dyn IdentityProvider>, service: TaskService, store: TaskStore) -> Self {
        let attachment = Arc::new(Mutex::new(Attachment::default()));

        let auth = {
            let attachment = attachment.clone();
            let store = store.clone();
            identity.on_auth_state_changed(Box::new(move |user: &Option<User>| {
                attachment.lock().follow(user, &service, &store);
            }))
        };

        TaskSession { store, attachment, auth }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn user(&self) -> Option<User> {
        self.attachment.lock().user.clone()
    }

    /// Whether a live task subscription is held.
    pub fn is_attached(&self) -> bool {
        self.attachment.lock().is_live()
    }

    /// Stops following auth state and releases the task subscription.
    pub fn close(&mut self) {
        self.auth.unsubscribe();
        self.attachment.lock().release(&self.store);
    }
}

impl Drop for TaskSession {
    fn drop(&mut self) {
        self.close();
    }
}
