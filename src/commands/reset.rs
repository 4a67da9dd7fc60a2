use super::login::prompt_email;
use crate::{api::IdentityProvider, db::accounts::Accounts, libs::messages::Message, msg_error, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Account email; prompted when omitted
    #[arg(short, long)]
    email: Option<String>,
}

pub fn cmd(args: ResetArgs) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => prompt_email()?,
    };

    match Accounts::new()?.reset_password(&email) {
        Ok(()) => msg_success!(Message::PasswordResetRequested(email)),
        Err(e) => msg_error!(Message::ResetFailed(e.to_string())),
    }
    Ok(())
}
