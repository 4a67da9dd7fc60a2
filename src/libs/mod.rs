//! Core library modules for the gigtask application.
//!
//! Everything that does not talk to SQLite or a terminal lives here: the
//! task model, the view model builder that groups tasks into sections, the
//! observable store the views read from and the service that keeps that
//! store in sync with the document store.
//!
//! ## Features
//!
//! - **Domain**: tasks, filters, date classification, calendar marks
//! - **State**: observable task store, session bound to the signed-in user
//! - **Sync**: task service over the document store change feed
//! - **Infrastructure**: configuration, data storage, messaging
//! - **User Interface**: console rendering and formatting
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Local;
//! use gigtask::libs::filter::Filter;
//! use gigtask::libs::view_model::build_view_model;
//!
//! let view_model = build_view_model(&[], "", &Filter::default(), Local::now());
//! assert_eq!(view_model.matched, 0);
//! ```

pub mod calendar;
pub mod config;
pub mod credentials;
pub mod data_storage;
pub mod filter;
pub mod formatter;
pub mod messages;
pub mod session;
pub mod store;
pub mod sync;
pub mod task;
pub mod view;
pub mod view_model;
