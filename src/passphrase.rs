//! Acquiring a new passphrase with a typed confirmation.
//!
//! The vault core never prompts on its own.  Whatever actually reads the
//! passphrase (a terminal, a test script) implements `PassphraseSource`,
//! and `acquire_new` drives the enter/confirm exchange on top of it.

use tracing::debug;
use zeroize::Zeroizing;

use crate::errors::{PwdmError, Result};

/// Something that can read one passphrase entry.
///
/// Implementations must not echo or log what was typed.  Returning
/// `Err(PwdmError::UserCancelled)` aborts the whole acquisition.
pub trait PassphraseSource {
    fn read_passphrase(&mut self, prompt: &str) -> Result<Zeroizing<String>>;

    /// Called after a mismatched pair, before the next attempt.
    fn mismatch(&mut self) {}
}

/// Ask for a new passphrase twice until both entries agree.
///
/// `max_attempts` bounds the number of enter/confirm rounds; `None`
/// keeps asking until the entries match or the source cancels.  Running
/// out of attempts yields `PassphraseMismatch`.
pub fn acquire_new<S>(source: &mut S, max_attempts: Option<usize>) -> Result<Zeroizing<String>>
where
    S: PassphraseSource + ?Sized,
{
    let mut attempt = 0usize;

    loop {
        if max_attempts.is_some_and(|max| attempt >= max) {
            return Err(PwdmError::PassphraseMismatch);
        }
        attempt += 1;

        let passphrase = source.read_passphrase("Enter new passphrase")?;
        let retyped = source.read_passphrase("Retype new passphrase")?;

        if *passphrase == *retyped {
            return Ok(passphrase);
        }

        debug!(attempt, "passphrase confirmation mismatch");
        source.mismatch();
    }
}
