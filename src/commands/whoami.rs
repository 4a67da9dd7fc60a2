use crate::{api::IdentityProvider, db::accounts::Accounts, libs::messages::Message, msg_info, msg_print};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    match Accounts::new()?.current_user() {
        Some(user) => msg_print!(Message::SignedInAs(user.email)),
        None => msg_info!(Message::NotSignedIn),
    }
    Ok(())
}
