use super::context::AppContext;
use crate::{libs::messages::Message, msg_info, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DoneArgs {
    /// Task id or a unique prefix of it
    id: String,
}

pub fn cmd(args: DoneArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.require_user()?;
    let task = ctx.resolve_task(&user, &args.id)?;

    if ctx.service.toggle_completed(&task)? {
        msg_success!(Message::TaskCompleted(task.title));
    } else {
        msg_info!(Message::TaskReopened(task.title));
    }
    Ok(())
}
