use super::calendar::DayMarks;
use super::formatter::FormattedTask;
use super::task::Task;
use super::view_model::{Bucket, Section, ViewModel};
use anyhow::Result;
use chrono::{DateTime, Datelike, Days, Local, NaiveDate};
use prettytable::{format, row, Cell, Row, Table};
use std::collections::BTreeMap;

pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task], now: &DateTime<Local>) -> Result<()> {
        Self::task_table(tasks, now).printstd();

        Ok(())
    }

    /// Prints every surfaced section with its title and count.
    ///
    /// Empty sections are listed with a dash so the grouping stays visible.
    pub fn view_model(view_model: &ViewModel, now: &DateTime<Local>, show_completed: bool) -> Result<()> {
        for section in view_model.surfaced_sections().filter(|s| show_completed || s.bucket != Bucket::Completed) {
            Self::section(section, now)?;
        }

        Ok(())
    }

    pub fn section(section: &Section, now: &DateTime<Local>) -> Result<()> {
        println!("{} ({})", section.bucket.title(), section.tasks.len());
        if section.is_empty() {
            println!("  -");
        } else {
            Self::task_table(&section.tasks, now).printstd();
        }
        println!();

        Ok(())
    }

    /// Month grid with one glyph per task on each day; the selected day is bracketed.
    pub fn calendar(month: NaiveDate, marks: &BTreeMap<NaiveDate, DayMarks>) -> Result<()> {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(row!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);

        let first = month.with_day(1).unwrap_or(month);
        let mut cells: Vec<Cell> = (0..first.weekday().num_days_from_monday()).map(|_| Cell::new("")).collect();
        let mut day = first;
        while day.month() == first.month() {
            cells.push(Cell::new(&Self::day_cell(day, marks.get(&day))));
            if cells.len() == 7 {
                table.add_row(Row::new(std::mem::take(&mut cells)));
            }
            day = match day.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
        }
        if !cells.is_empty() {
            cells.resize_with(7, || Cell::new(""));
            table.add_row(Row::new(cells));
        }
        table.printstd();

        Ok(())
    }

    fn day_cell(day: NaiveDate, marks: Option<&DayMarks>) -> String {
        let label = match marks {
            Some(marks) if marks.selected => format!("[{:>2}]", day.day()),
            _ => format!(" {:>2} ", day.day()),
        };
        let glyphs: String = marks.map(|m| m.dots.iter().map(|dot| dot.glyph()).collect()).unwrap_or_default();
        if glyphs.is_empty() {
            label
        } else {
            format!("{}\n{}", label, glyphs)
        }
    }

    fn task_table(tasks: &[Task], now: &DateTime<Local>) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.set_titles(row!["ID", "TITLE", "DUE", "PRIORITY", "STATUS"]);
        for task in tasks {
            let formatted = FormattedTask::new(task, now);
            table.add_row(row![formatted.id, formatted.title, formatted.due, formatted.priority, formatted.status]);
        }
        table
    }
}
