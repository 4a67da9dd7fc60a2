use super::login::prompt_email;
use crate::{
    api::IdentityProvider,
    db::accounts::Accounts,
    libs::{
        credentials::{password_strength, validate_registration},
        messages::Message,
    },
    msg_error, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Password};

#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Account email; prompted when omitted
    #[arg(short, long)]
    email: Option<String>,
}

pub fn cmd(args: SignupArgs) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => prompt_email()?,
    };
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptPassword.to_string())
        .interact()?;
    msg_info!(Message::PasswordStrength(password_strength(&password).to_string()));
    let confirm = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptConfirmPassword.to_string())
        .interact()?;

    if let Err(e) = validate_registration(&email, &password, &confirm) {
        msg_error!(e);
        return Ok(());
    }

    match Accounts::new()?.sign_up(&email, &password) {
        Ok(user) => msg_success!(Message::AccountCreated(user.email)),
        Err(e) => msg_error!(Message::RegistrationFailed(e.to_string())),
    }
    Ok(())
}
