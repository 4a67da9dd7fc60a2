use crate::{
    api::IdentityProvider,
    db::accounts::Accounts,
    libs::{credentials::validate_login, messages::Message},
    msg_error, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Input, Password};

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email; prompted when omitted
    #[arg(short, long)]
    email: Option<String>,
}

pub fn cmd(args: LoginArgs) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => prompt_email()?,
    };
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPassword.to_string())
        .interact()?;

    if let Err(e) = validate_login(&email, &password) {
        msg_error!(e);
        return Ok(());
    }

    match Accounts::new()?.sign_in(&email, &password) {
        Ok(user) => msg_success!(Message::SignedIn(user.email)),
        Err(e) => msg_error!(Message::LoginFailed(e.to_string())),
    }
    Ok(())
}

pub(crate) fn prompt_email() -> Result<String> {
    let email: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptEmail.to_string())
        .interact_text()?;
    Ok(email.trim().to_string())
}
