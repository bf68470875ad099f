//! `pwdm add`: add a new password and save the storage.

use crate::cli::output;
use crate::cli::{read_secret, Context};
use crate::errors::Result;

/// Execute the `add` command.
pub fn execute(ctx: &Context, storage: &str, description: &str, secret: Option<&str>) -> Result<()> {
    // Open and validate first so nobody types a password that gets rejected.
    let mut session = ctx.open_session(storage)?;
    session.vault().check_new_description(description)?;

    let secret = read_secret(secret)?;
    session.add(description, &secret)?;
    session.save()?;

    output::success(&format!(
        "New password '{description}' added to {} ({} total)",
        session.path().display(),
        session.vault().len()
    ));

    Ok(())
}
