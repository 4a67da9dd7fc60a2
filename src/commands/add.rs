use super::context::{parse_due, AppContext};
use crate::{
    libs::{
        messages::Message,
        sync::TaskError,
        task::{NewTask, Priority},
    },
    msg_error, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Task title
    title: String,
    /// Longer description
    #[arg(short, long, default_value = "")]
    description: String,
    /// Due date: today, tomorrow, YYYY-MM-DD or "YYYY-MM-DD HH:MM"
    #[arg(long, default_value = "today")]
    due: String,
    /// Priority: low, medium or high
    #[arg(short, long, default_value = "medium")]
    priority: Priority,
}

pub fn cmd(args: AddArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.require_user()?;
    let due_date = parse_due(&args.due, &Local::now())?;

    let task = NewTask::new(&user.id, &args.title, &args.description, due_date, args.priority);
    match ctx.service.create_task(task) {
        Ok(_) => msg_success!(Message::TaskCreated(args.title.trim().to_string())),
        Err(TaskError::TitleRequired) => msg_error!(Message::TaskTitleRequired),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
