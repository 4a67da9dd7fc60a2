use crate::{api::IdentityProvider, db::accounts::Accounts, libs::messages::Message, msg_info, msg_success};
use anyhow::Result;

pub fn cmd() -> Result<()> {
    let accounts = Accounts::new()?;
    if accounts.current_user().is_none() {
        msg_info!(Message::NotSignedIn);
        return Ok(());
    }

    accounts.sign_out()?;
    msg_success!(Message::SignedOut);
    Ok(())
}
