//! Task view model builder.
//!
//! Turns the current user's task list plus the search/filter state into the
//! date-grouped sections rendered by the task list view.
//!
//! ## Classification
//!
//! Buckets are assigned by a first-match chain over local calendar dates:
//!
//! ```text
//! completed                      -> Completed
//! due  <  today                  -> Overdue
//! due  == today                  -> Today
//! due  == today + 1              -> Tomorrow
//! today < due <= today + 7       -> This Week
//! otherwise                      -> Later
//! ```
//!
//! Tomorrow also falls inside the This Week range; the chain order decides.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Local;
//! use gigtask::libs::filter::Filter;
//! use gigtask::libs::view_model::build_view_model;
//!
//! let model = build_view_model(&[], "", &Filter::default(), Local::now());
//! assert_eq!(model.matched, 0);
//! assert!(!model.overdue.surfaced);
//! ```

use super::filter::{Filter, StatusFilter};
use super::task::{Task, TaskId};
use chrono::{DateTime, Days, Local, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

const THIS_WEEK_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Overdue,
    Today,
    Tomorrow,
    ThisWeek,
    Later,
    Completed,
}

impl Bucket {
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Overdue => "Overdue",
            Bucket::Today => "Today",
            Bucket::Tomorrow => "Tomorrow",
            Bucket::ThisWeek => "This Week",
            Bucket::Later => "Later",
            Bucket::Completed => "Completed",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One named group of tasks plus whether the consumer should show it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub bucket: Bucket,
    pub tasks: Vec<Task>,
    pub surfaced: bool,
}

impl Section {
    fn new(bucket: Bucket, tasks: Vec<Task>, surfaced: bool) -> Self {
        Section { bucket, tasks, surfaced }
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Grouped, ordered projection of the task list. Recomputed, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// Today, Tomorrow, This Week and Later, always in that order.
    pub active: [Section; 4],
    pub overdue: Section,
    pub completed: Section,
    /// Number of tasks that passed the filter.
    pub matched: usize,
    pub has_active_filters: bool,
}

impl ViewModel {
    /// All sections in render order: active ones, then Overdue, then Completed.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.active.iter().chain([&self.overdue, &self.completed])
    }

    pub fn surfaced_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections().filter(|s| s.surfaced)
    }

    pub fn section(&self, bucket: Bucket) -> &Section {
        match bucket {
            Bucket::Today => &self.active[0],
            Bucket::Tomorrow => &self.active[1],
            Bucket::ThisWeek => &self.active[2],
            Bucket::Later => &self.active[3],
            Bucket::Overdue => &self.overdue,
            Bucket::Completed => &self.completed,
        }
    }

    pub fn bucket_of(&self, id: &TaskId) -> Option<Bucket> {
        self.sections().find(|s| s.tasks.iter().any(|t| &t.id == id)).map(|s| s.bucket)
    }

    /// True when nothing matched the current search and filter.
    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }
}

/// Assigns an incomplete or completed task to its bucket relative to `today`.
pub fn classify(task: &Task, today: NaiveDate) -> Bucket {
    if task.completed {
        return Bucket::Completed;
    }
    classify_date(task.due_date.date_naive(), today)
}

/// Date-only part of [`classify`] for an incomplete task.
pub fn classify_date(due: NaiveDate, today: NaiveDate) -> Bucket {
    let tomorrow = add_days(today, 1);
    let week_end = add_days(today, THIS_WEEK_DAYS);

    if due < today {
        Bucket::Overdue
    } else if due == today {
        Bucket::Today
    } else if due == tomorrow {
        Bucket::Tomorrow
    } else if due <= week_end {
        Bucket::ThisWeek
    } else {
        Bucket::Later
    }
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Filters, classifies and groups `tasks` for rendering.
///
/// `now` is injected so the result depends only on the arguments; only its
/// local date is used. Within each section tasks keep their input order.
pub fn build_view_model(tasks: &[Task], search_query: &str, filter: &Filter, now: DateTime<Local>) -> ViewModel {
    let today = now.date_naive();

    let mut overdue = Vec::new();
    let mut due_today = Vec::new();
    let mut tomorrow = Vec::new();
    let mut this_week = Vec::new();
    let mut later = Vec::new();
    let mut completed = Vec::new();
    let mut matched = 0;

    for task in tasks.iter().filter(|t| filter.matches(t, search_query)) {
        matched += 1;
        let target = match classify(task, today) {
            Bucket::Overdue => &mut overdue,
            Bucket::Today => &mut due_today,
            Bucket::Tomorrow => &mut tomorrow,
            Bucket::ThisWeek => &mut this_week,
            Bucket::Later => &mut later,
            Bucket::Completed => &mut completed,
        };
        target.push(task.clone());
    }

    let overdue_surfaced = !overdue.is_empty();
    let completed_surfaced = !completed.is_empty() && filter.status != StatusFilter::Incomplete;

    ViewModel {
        active: [
            Section::new(Bucket::Today, due_today, true),
            Section::new(Bucket::Tomorrow, tomorrow, true),
            Section::new(Bucket::ThisWeek, this_week, true),
            Section::new(Bucket::Later, later, true),
        ],
        overdue: Section::new(Bucket::Overdue, overdue, overdue_surfaced),
        completed: Section::new(Bucket::Completed, completed, completed_surfaced),
        matched,
        has_active_filters: filter.has_active_filters(),
    }
}

/// Stable ascending sort by due date; equal dates keep their input order.
pub fn sort_by_due_date_ascending(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by_key(|t| t.due_date);
    tasks
}

/// Keeps the first record seen for every id, in first-seen order.
pub fn dedupe_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::with_capacity(tasks.len());
    let mut unique = Vec::with_capacity(tasks.len());
    for task in tasks {
        if seen.insert(task.id.clone()) {
            unique.push(task);
        } else {
            tracing::warn!(id = %task.id, "duplicate task record skipped");
        }
    }
    unique
}

/// Dedupe then sort: the sequence every fetched or pushed task list goes through.
pub fn normalize_snapshot(tasks: Vec<Task>) -> Vec<Task> {
    sort_by_due_date_ascending(dedupe_by_id(tasks))
}
