#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate, TimeZone};
    use gigtask::libs::calendar::{marked_dates, tasks_for_date, Dot};
    use gigtask::libs::formatter::{format_due_date, is_overdue, FormattedTask};
    use gigtask::libs::task::{NewTask, Priority, Task, TaskId};

    fn task(id: &str, day: u32, priority: Priority, completed: bool) -> Task {
        let due = Local.with_ymd_and_hms(2024, 6, day, 18, 0, 0).unwrap();
        let mut new = NewTask::new("u1", id, "", due, priority);
        new.completed = completed;
        new.into_task(TaskId::from(id), due)
    }

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_calendar_marks_and_day_listing_agree() {
        let tasks = vec![
            task("report", 10, Priority::High, false),
            task("gym", 10, Priority::Low, true),
            task("taxes", 14, Priority::Medium, false),
        ];

        let marks = marked_dates(&tasks, june(12));
        assert_eq!(marks[&june(10)].dots, vec![Dot::Priority(Priority::High), Dot::Completed]);
        assert_eq!(marks[&june(14)].dots, vec![Dot::Priority(Priority::Medium)]);
        assert!(marks[&june(12)].selected);
        assert!(marks[&june(12)].dots.is_empty());

        let day: Vec<String> = tasks_for_date(&tasks, june(10)).into_iter().map(|t| t.title).collect();
        assert_eq!(day, vec!["report", "gym"]);
        assert!(tasks_for_date(&tasks, june(12)).is_empty());
    }

    #[test]
    fn test_task_rows_for_display() {
        let now = Local.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let overdue = task("0123456789abcdef", 9, Priority::High, false);
        let upcoming = task("later", 11, Priority::Low, false);

        assert!(is_overdue(&overdue, &now));
        assert_eq!(format_due_date(&upcoming.due_date, &now), "Tomorrow");

        let row = FormattedTask::new(&overdue, &now);
        assert_eq!(row.id, "01234567");
        assert_eq!(row.due, "Jun 9");
        assert_eq!(row.priority, "High");
        assert_eq!(row.status, "overdue");
    }
}
