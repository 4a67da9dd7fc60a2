//! Database layer for the gigtask application.
//!
//! Local SQLite implementations of the two external collaborators: the task
//! document store and the identity provider. Both share one database file
//! and one migration history.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Local;
//! use gigtask::api::{DocumentStore, IdentityProvider};
//! use gigtask::db::{accounts::Accounts, tasks::Tasks};
//! use gigtask::libs::task::{NewTask, Priority};
//!
//! let dir = tempfile::tempdir()?;
//! let db_path = dir.path().join("gigtask.db");
//! let accounts = Accounts::open(&db_path, dir.path().join("session.json"))?;
//! let tasks = Tasks::open(&db_path)?;
//!
//! let user = accounts.sign_up("ann@example.com", "secret1")?;
//! tasks.create(&NewTask::new(&user.id, "Review code", "Check PR #123", Local::now(), Priority::Medium))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup shared by every store.
///
/// Opens the SQLite file (or an in-memory database), enables foreign keys
/// and applies pending migrations.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// Local identity provider: accounts, password digests, session file.
pub mod accounts;

/// Task document store with a per-user change feed.
pub mod tasks;
