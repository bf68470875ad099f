//! `pwdm del`: remove passwords whose description contains a pattern.

use crate::cli::output;
use crate::cli::{confirm_delete, Context};
use crate::errors::Result;

/// Execute the `del` command.
pub fn execute(ctx: &Context, storage: &str, pattern: &str, force: bool) -> Result<()> {
    let mut session = ctx.open_session(storage)?;

    if session.vault().is_empty() {
        output::info("Your password storage is empty.");
        return Ok(());
    }

    // Unless --force is set, every match is confirmed individually.
    let removed = if force {
        session.delete(pattern, |_| true)?
    } else {
        session.delete(pattern, confirm_delete)?
    };

    if removed > 0 {
        session.save()?;
    }

    output::success(&format!("Deleted {removed} password(s)."));
    Ok(())
}
