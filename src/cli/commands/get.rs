//! `pwdm get`: print every password whose description contains a pattern.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;

/// Execute the `get` command.
pub fn execute(ctx: &Context, storage: &str, pattern: Option<&str>) -> Result<()> {
    let session = ctx.open_session(storage)?;

    // No pattern means "everything".
    let matches = session.vault().find(pattern.unwrap_or(""))?;
    output::print_entries_table(&matches);

    Ok(())
}
