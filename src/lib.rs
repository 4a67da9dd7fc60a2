//! # gigtask - personal task manager
//!
//! Groups tasks into Overdue, Today, Tomorrow, This Week and Later sections,
//! filters them by priority, status and free-text search, and keeps the
//! grouping live while the underlying documents change.
//!
//! ## Features
//!
//! - **View Model Builder**: pure date classification and section assembly
//! - **Live Sync**: change-feed subscriptions with scoped release
//! - **Accounts**: sign-up, sign-in and password reset requests
//! - **Calendar**: per-day task markers
//! - **Pluggable Backends**: document store and identity provider traits
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gigtask::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
