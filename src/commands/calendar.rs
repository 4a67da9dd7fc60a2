use super::context::AppContext;
use crate::{
    libs::{
        calendar::{marked_dates, tasks_for_date},
        messages::Message,
        view::View,
    },
    msg_bail_anyhow, msg_info, msg_print,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// Selected day (YYYY-MM-DD), today by default
    #[arg(short, long)]
    date: Option<String>,
}

pub fn cmd(args: CalendarArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.require_user()?;

    let now = Local::now();
    let selected = match &args.date {
        Some(input) => match NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => msg_bail_anyhow!(Message::InvalidDueDate(input.clone())),
        },
        None => now.date_naive(),
    };

    let tasks = ctx.service.get_tasks(&user.id)?;
    let marks = marked_dates(&tasks, selected);

    msg_print!(Message::CalendarHeader(selected.format("%B %Y").to_string()), true);
    View::calendar(selected, &marks)?;

    let day = selected.format("%A, %B %-d").to_string();
    let due_that_day = tasks_for_date(&tasks, selected);
    if due_that_day.is_empty() {
        msg_info!(Message::NoTasksForDate(day));
        return Ok(());
    }

    msg_print!(Message::TasksForDateHeader(day), true);
    View::tasks(&due_that_day, &now)?;
    Ok(())
}
