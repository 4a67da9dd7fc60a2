//! Calendar projection: per-day markers and the task list for one day.

use super::task::{Priority, Task};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Kind of dot drawn under a day. Completed tasks lose their priority color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dot {
    Completed,
    Priority(Priority),
}

impl Dot {
    pub fn for_task(task: &Task) -> Self {
        if task.completed {
            Dot::Completed
        } else {
            Dot::Priority(task.priority)
        }
    }

    /// Single-character glyph used by the terminal calendar.
    pub fn glyph(&self) -> char {
        match self {
            Dot::Completed => '·',
            Dot::Priority(Priority::High) => '!',
            Dot::Priority(Priority::Medium) => '*',
            Dot::Priority(Priority::Low) => '+',
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayMarks {
    pub dots: Vec<Dot>,
    pub selected: bool,
}

/// One dot per task on its local due date; `selected` is always present.
pub fn marked_dates(tasks: &[Task], selected: NaiveDate) -> BTreeMap<NaiveDate, DayMarks> {
    let mut marked: BTreeMap<NaiveDate, DayMarks> = BTreeMap::new();
    for task in tasks {
        marked.entry(task.due_date.date_naive()).or_default().dots.push(Dot::for_task(task));
    }
    marked.entry(selected).or_default().selected = true;
    marked
}

/// Every task due on `date`, completed or not, in input order.
pub fn tasks_for_date(tasks: &[Task], date: NaiveDate) -> Vec<Task> {
    tasks.iter().filter(|t| t.due_date.date_naive() == date).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::task::{NewTask, TaskId};
    use chrono::{Local, TimeZone};

    fn task(id: &str, day: u32, priority: Priority, completed: bool) -> Task {
        let due = Local.with_ymd_and_hms(2024, 6, day, 10, 0, 0).unwrap();
        let mut new = NewTask::new("u1", id, "", due, priority);
        new.completed = completed;
        new.into_task(TaskId::from(id), due)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_marked_dates_collects_dots_per_day() {
        let tasks = vec![
            task("1", 10, Priority::High, false),
            task("2", 10, Priority::High, true),
            task("3", 12, Priority::Low, false),
        ];
        let marked = marked_dates(&tasks, date(10));

        assert_eq!(marked[&date(10)].dots, vec![Dot::Priority(Priority::High), Dot::Completed]);
        assert!(marked[&date(10)].selected);
        assert_eq!(marked[&date(12)].dots, vec![Dot::Priority(Priority::Low)]);
        assert!(!marked[&date(12)].selected);
    }

    #[test]
    fn test_selected_day_without_tasks_is_marked() {
        let marked = marked_dates(&[], date(3));
        assert_eq!(marked.len(), 1);
        assert!(marked[&date(3)].selected);
        assert!(marked[&date(3)].dots.is_empty());
    }

    #[test]
    fn test_tasks_for_date_includes_completed() {
        let tasks = vec![task("1", 10, Priority::High, true), task("2", 11, Priority::Low, false), task("3", 10, Priority::Low, false)];
        let ids: Vec<String> = tasks_for_date(&tasks, date(10)).into_iter().map(|t| t.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
