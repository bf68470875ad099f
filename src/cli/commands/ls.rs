//! `pwdm ls`: list storage files in the storage directory.

use crate::cli::output;
use crate::cli::Context;
use crate::errors::Result;
use crate::vault::list_storages;

/// Execute the `ls` command.
pub fn execute(ctx: &Context) -> Result<()> {
    if !ctx.storage_dir.exists() {
        output::info(&format!(
            "Storage directory {} does not exist.",
            ctx.storage_dir.display()
        ));
        output::tip("Run `pwdm new <name>` to create a storage.");
        return Ok(());
    }

    let names = list_storages(&ctx.storage_dir)?;
    if names.is_empty() {
        output::info("No password storages found.");
        output::tip("Run `pwdm new <name>` to create your first storage.");
        return Ok(());
    }

    for name in &names {
        println!("{name}");
    }

    Ok(())
}
