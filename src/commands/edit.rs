use super::context::{parse_due, AppContext};
use crate::{
    libs::{
        messages::Message,
        sync::TaskError,
        task::{Priority, TaskPatch},
    },
    msg_error, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Task id or a unique prefix of it
    id: String,
    /// New title
    #[arg(short, long)]
    title: Option<String>,
    /// New description
    #[arg(short, long)]
    description: Option<String>,
    /// New due date: today, tomorrow, YYYY-MM-DD or "YYYY-MM-DD HH:MM"
    #[arg(long)]
    due: Option<String>,
    /// New priority: low, medium or high
    #[arg(short, long)]
    priority: Option<Priority>,
}

pub fn cmd(args: EditArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.require_user()?;
    let task = ctx.resolve_task(&user, &args.id)?;

    let mut patch = TaskPatch::default();
    if let Some(title) = &args.title {
        patch = patch.title(title);
    }
    if let Some(description) = &args.description {
        patch = patch.description(description);
    }
    if let Some(due) = &args.due {
        patch = patch.due_date(parse_due(due, &Local::now())?);
    }
    if let Some(priority) = args.priority {
        patch = patch.priority(priority);
    }
    if patch.is_empty() {
        msg_error!(Message::NoChangesProvided);
        return Ok(());
    }

    let title = patch.title.clone().map(|t| t.trim().to_string()).unwrap_or(task.title);
    match ctx.service.update_task(&task.id, patch) {
        Ok(()) => msg_success!(Message::TaskUpdated(title)),
        Err(TaskError::TitleRequired) => msg_error!(Message::TaskTitleRequired),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
