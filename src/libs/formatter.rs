//! Display formatting for task dates and priorities.
//!
//! This module turns task fields into the short strings shown in task
//! tables, calendar listings and the `watch` view.
//!
//! ## Format Specifications
//!
//! ### Due Date Format
//! - Due today → "Today"
//! - Due tomorrow → "Tomorrow"
//! - Anything else → abbreviated month and day, e.g. "Jun 5"
//!
//! All comparisons use the local calendar date; the time of day is ignored.
//!
//! ## Examples
//!
//! ```rust
//! use chrono::{Local, TimeZone};
//! use gigtask::libs::formatter::format_due_date;
//!
//! let now = Local.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
//! let due = Local.with_ymd_and_hms(2024, 6, 11, 18, 30, 0).unwrap();
//! assert_eq!(format_due_date(&due, &now), "Tomorrow");
//! ```

use super::filter::capitalize;
use super::task::{Priority, Task};
use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Pre-formatted task row for table rendering.
///
/// All values are strings so the row can be handed straight to the table
/// printer or serialized without further formatting.
#[derive(Debug, Clone, Serialize)]
pub struct FormattedTask {
    pub id: String,
    pub title: String,
    pub due: String,
    pub priority: String,
    pub status: String,
}

impl FormattedTask {
    pub fn new(task: &Task, now: &DateTime<Local>) -> Self {
        let status = if task.completed {
            "done"
        } else if is_overdue(task, now) {
            "overdue"
        } else {
            "open"
        };

        FormattedTask {
            id: short_id(task.id.as_str()),
            title: task.title.clone(),
            due: format_due_date(&task.due_date, now),
            priority: priority_label(task.priority),
            status: status.to_string(),
        }
    }
}

/// Formats a due date relative to `now`.
///
/// # Examples
///
/// ```rust
/// use chrono::{Local, TimeZone};
/// use gigtask::libs::formatter::format_due_date;
///
/// let now = Local.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
/// assert_eq!(format_due_date(&now, &now), "Today");
/// let later = Local.with_ymd_and_hms(2024, 6, 5, 8, 0, 0).unwrap();
/// assert_eq!(format_due_date(&later, &now), "Jun 5");
/// ```
pub fn format_due_date(due: &DateTime<Local>, now: &DateTime<Local>) -> String {
    let today = now.date_naive();
    let due_day = due.date_naive();

    if due_day == today {
        "Today".to_string()
    } else if Some(due_day) == today.checked_add_days(Days::new(1)) {
        "Tomorrow".to_string()
    } else {
        due_day.format("%b %-d").to_string()
    }
}

/// An incomplete task whose due date is before today.
pub fn is_overdue(task: &Task, now: &DateTime<Local>) -> bool {
    !task.completed && task.due_date.date_naive() < now.date_naive()
}

pub fn priority_label(priority: Priority) -> String {
    capitalize(priority.as_str())
}

/// First eight characters of an id, enough to address a task from the CLI.
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Parses a due date typed on the command line.
///
/// Accepts `today`, `tomorrow`, `YYYY-MM-DD` and `YYYY-MM-DD HH:MM`. Date-only
/// input lands at noon local time, clear of DST transitions at midnight.
pub fn parse_due_date(input: &str, now: &DateTime<Local>) -> Option<DateTime<Local>> {
    let input = input.trim();
    let noon = NaiveTime::from_hms_opt(12, 0, 0)?;

    let naive = match input.to_lowercase().as_str() {
        "today" => now.date_naive().and_time(noon),
        "tomorrow" => now.date_naive().checked_add_days(Days::new(1))?.and_time(noon),
        _ => match NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
            Ok(datetime) => datetime,
            Err(_) => NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?.and_time(noon),
        },
    };
    naive.and_local_timezone(Local).earliest()
}
