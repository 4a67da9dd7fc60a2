//! Seams to the external collaborators gigtask builds on.
//!
//! Persistence and authentication are capabilities, not implementations:
//! the rest of the crate talks to a [`DocumentStore`] and an
//! [`IdentityProvider`]. The `db` module ships SQLite-backed versions of
//! both; a managed backend plugs in by implementing the same traits.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gigtask::api::DocumentStore;
//! use gigtask::db::tasks::Tasks;
//!
//! let store = Tasks::new()?;
//! let tasks = store.fetch_all("user-1")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod documents;
pub mod identity;
pub mod subscription;

pub use documents::{DocumentStore, ErrorCallback, SnapshotCallback, StoreError};
pub use identity::{AuthError, AuthStateCallback, IdentityProvider, User};
pub use subscription::{Subscribers, Subscription};
