//! Shared setup for commands that need the stores and a signed-in user.

use crate::{
    api::{IdentityProvider, User},
    db::{accounts::Accounts, tasks::Tasks},
    libs::{config::Config, formatter::parse_due_date, messages::Message, sync::TaskService, task::Task},
    msg_error_anyhow,
};
use anyhow::Result;
use chrono::{DateTime, Local};
use std::sync::Arc;

pub struct AppContext {
    pub config: Config,
    pub identity: Arc<Accounts>,
    pub tasks: Arc<Tasks>,
    pub service: TaskService,
}

impl AppContext {
    pub fn new() -> Result<Self> {
        let config = Config::read()?;
        let identity = Arc::new(Accounts::new()?);
        let tasks = Arc::new(Tasks::new()?);
        let service = TaskService::new(tasks.clone());

        Ok(AppContext {
            config,
            identity,
            tasks,
            service,
        })
    }

    pub fn require_user(&self) -> Result<User> {
        self.identity.current_user().ok_or_else(|| msg_error_anyhow!(Message::NotSignedIn))
    }

    /// Finds the user's task whose id starts with `prefix`.
    pub fn resolve_task(&self, user: &User, prefix: &str) -> Result<Task> {
        let tasks = self.service.get_tasks(&user.id)?;
        resolve_prefix(tasks, prefix)
    }
}

pub fn resolve_prefix(tasks: Vec<Task>, prefix: &str) -> Result<Task> {
    let prefix = prefix.trim();
    let mut matches: Vec<Task> = tasks.into_iter().filter(|t| t.id.as_str().starts_with(prefix)).collect();
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(msg_error_anyhow!(Message::TaskNotFound(prefix.to_string()))),
        count => {
            // An exact id wins over longer ids sharing it as a prefix.
            if let Some(position) = matches.iter().position(|t| t.id.as_str() == prefix) {
                return Ok(matches.remove(position));
            }
            Err(msg_error_anyhow!(Message::TaskIdAmbiguous(prefix.to_string(), count)))
        }
    }
}

pub fn parse_due(input: &str, now: &DateTime<Local>) -> Result<DateTime<Local>> {
    parse_due_date(input, now).ok_or_else(|| msg_error_anyhow!(Message::InvalidDueDate(input.to_string())))
}
