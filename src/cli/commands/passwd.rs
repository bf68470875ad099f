//! `pwdm passwd`: change the passphrase of a storage.
//!
//! Decrypts the storage with the current passphrase, asks for a new one
//! (twice), re-encrypts every entry under it and writes the file
//! atomically.

use crate::cli::output;
use crate::cli::{prompt_new_passphrase, prompt_passphrase, Context, NEW_PASSPHRASE_ENV};
use crate::errors::{PwdmError, Result};
use crate::vault::VaultSession;

/// Execute the `passwd` command.
pub fn execute(ctx: &Context, storage: &str) -> Result<()> {
    let path = ctx.resolve(storage);
    if !path.exists() {
        return Err(PwdmError::StorageNotFound(path));
    }

    // 1. Open the storage with the current passphrase.
    output::info("Enter the current passphrase.");
    let old = prompt_passphrase("Enter old passphrase")?;
    let mut session = VaultSession::open(ctx.store(), &path, old.clone())?;

    // 2. Prompt for the new passphrase.
    output::info("Choose the new passphrase.");
    let new = prompt_new_passphrase(&ctx.settings, NEW_PASSPHRASE_ENV)?;

    // 3. Re-encrypt and publish atomically.
    session.change_passphrase(&old, new)?;

    output::success(&format!(
        "Passphrase changed for {} ({} passwords re-encrypted)",
        session.path().display(),
        session.vault().len()
    ));

    Ok(())
}
