//! Plaintext payload carried inside the encrypted envelope.
//!
//! The payload is a single JSON object mapping each description to its
//! secret, with no further framing:
//!
//! ```text
//! {"mysql admin":"admin","office mail":"abc123"}
//! ```
//!
//! Keys are written in sorted order so saving an unchanged vault twice
//! produces identical plaintext.

use std::collections::HashMap;

use zeroize::Zeroizing;

use super::entries::Vault;
use crate::errors::{PwdmError, Result};

/// Serialize a vault into its JSON payload.
///
/// The buffer is wiped when dropped since it holds every secret.
pub fn encode_payload(vault: &Vault) -> Result<Zeroizing<Vec<u8>>> {
    serde_json::to_vec(&vault.sorted_entries())
        .map(Zeroizing::new)
        .map_err(|e| PwdmError::SerializationError(format!("entries: {e}")))
}

/// Parse a decrypted JSON payload back into a vault.
///
/// Only runs on authenticated plaintext, so a failure here means the file
/// was sealed by something that is not pwdm rather than a wrong passphrase.
pub fn decode_payload(bytes: &[u8]) -> Result<Vault> {
    let entries: HashMap<String, String> = serde_json::from_slice(bytes)
        .map_err(|e| PwdmError::SerializationError(format!("entries JSON: {e}")))?;
    Vault::from_entries(entries)
}
