//! `pwdm show`: print the descriptions held in a storage.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;

/// Execute the `show` command.
pub fn execute(ctx: &Context, storage: &str) -> Result<()> {
    let session = ctx.open_session(storage)?;
    output::print_descriptions(&session.vault().list());
    Ok(())
}
