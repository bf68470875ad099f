//! `pwdm new`: create a new, empty password storage.

use std::fs;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{prompt_new_passphrase, Context, PASSPHRASE_ENV};
use crate::errors::{PwdmError, Result};
use crate::vault::VaultSession;

/// Execute the `new` command.
pub fn execute(ctx: &Context, name: &str) -> Result<()> {
    let session = create(ctx, name, || {
        prompt_new_passphrase(&ctx.settings, PASSPHRASE_ENV)
    })?;

    output::success(&format!(
        "New password storage created at {}",
        session.path().display()
    ));
    output::tip(&format!("Run `pwdm add {name} <description>` to add a password."));

    Ok(())
}

/// Create the storage file and return the open session.
///
/// `passphrase` is only called once the target is known to be free, so
/// nobody types a passphrase for a file that cannot be created.
pub fn create<F>(ctx: &Context, name: &str, passphrase: F) -> Result<VaultSession>
where
    F: FnOnce() -> Result<Zeroizing<String>>,
{
    if name.trim().is_empty() {
        return Err(PwdmError::CommandFailed(
            "storage name cannot be empty".into(),
        ));
    }

    let path = ctx.resolve(name);
    if path.exists() {
        return Err(PwdmError::StorageAlreadyExists(path));
    }

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            output::info(&format!("Created storage directory: {}", parent.display()));
        }
    }

    let passphrase = passphrase()?;
    VaultSession::create(ctx.store(), &path, passphrase)
}
