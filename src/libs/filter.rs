//! Priority/status filter and free-text search predicate.
//!
//! A task is shown only when it satisfies all three sub-predicates at once:
//! the search query, the priority selector and the status selector.

use super::task::{Priority, Task};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl PriorityFilter {
    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Low => priority == Priority::Low,
            PriorityFilter::Medium => priority == Priority::Medium,
            PriorityFilter::High => priority == Priority::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityFilter::All => "all",
            PriorityFilter::Low => "low",
            PriorityFilter::Medium => "medium",
            PriorityFilter::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl StatusFilter {
    pub fn matches(&self, completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => completed,
            StatusFilter::Incomplete => !completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Completed => "completed",
            StatusFilter::Incomplete => "incomplete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFilterError {
    #[error("unknown priority filter '{0}', expected all, low, medium or high")]
    Priority(String),
    #[error("unknown status filter '{0}', expected all, completed or incomplete")]
    Status(String),
}

impl FromStr for PriorityFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(PriorityFilter::All),
            "low" => Ok(PriorityFilter::Low),
            "medium" => Ok(PriorityFilter::Medium),
            "high" => Ok(PriorityFilter::High),
            other => Err(ParseFilterError::Priority(other.to_string())),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "completed" | "done" => Ok(StatusFilter::Completed),
            "incomplete" | "active" => Ok(StatusFilter::Incomplete),
            other => Err(ParseFilterError::Status(other.to_string())),
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ephemeral filter state of the task list. Never persisted with tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub priority: PriorityFilter,
    #[serde(default)]
    pub status: StatusFilter,
}

/// Partial filter change; `None` keeps the current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub priority: Option<PriorityFilter>,
    pub status: Option<StatusFilter>,
}

impl FilterPatch {
    pub fn priority(mut self, priority: PriorityFilter) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }
}

impl Filter {
    pub fn new(priority: PriorityFilter, status: StatusFilter) -> Self {
        Filter { priority, status }
    }

    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    /// Conjunction of the search, priority and status predicates.
    pub fn matches(&self, task: &Task, query: &str) -> bool {
        matches_search(task, query) && self.priority.matches(task.priority) && self.status.matches(task.completed)
    }

    pub fn has_active_filters(&self) -> bool {
        self.priority != PriorityFilter::All || self.status != StatusFilter::All
    }

    /// Short summary of the active selectors, e.g. `Active • High Priority`.
    pub fn badge_text(&self) -> Option<String> {
        let mut parts = Vec::new();
        match self.status {
            StatusFilter::All => {}
            StatusFilter::Completed => parts.push("Completed".to_string()),
            StatusFilter::Incomplete => parts.push("Active".to_string()),
        }
        if self.priority != PriorityFilter::All {
            parts.push(format!("{} Priority", capitalize(self.priority.as_str())));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" • "))
        }
    }
}

/// Case-insensitive substring match against title or description.
pub fn matches_search(task: &Task, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    task.title.to_lowercase().contains(&needle) || task.description.to_lowercase().contains(&needle)
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
