//! Passphrase-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  Parameters are configurable via `Argon2Params`
//! (loaded from `.pwdm.toml` or sensible defaults) and are stored in
//! every blob so a storage always reopens with the settings it was
//! sealed with.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::Zeroize;

use super::keys::{StorageKey, KEY_LEN};
use crate::errors::{PwdmError, Result};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Maximum memory cost in KiB (1 GB).
///
/// Parameters are read back from untrusted files, so an upper bound keeps
/// a crafted blob from making us allocate arbitrary amounts of memory.
pub const MAX_MEMORY_KIB: u32 = 1_048_576;

/// Upper bound on iterations accepted from a blob.
pub const MAX_ITERATIONS: u32 = 64;

/// Upper bound on lanes accepted from a blob.
pub const MAX_PARALLELISM: u32 = 64;

/// Configurable Argon2id parameters.
///
/// These map 1:1 to the fields in `Settings` so the CLI can pass
/// whatever the user configured in `.pwdm.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Check that the parameters are within the accepted range.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_MEMORY_KIB..=MAX_MEMORY_KIB).contains(&self.memory_kib) {
            return Err(PwdmError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be between {MIN_MEMORY_KIB} and {MAX_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(PwdmError::KeyDerivationFailed(format!(
                "Argon2 iterations must be between 1 and {MAX_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(PwdmError::KeyDerivationFailed(format!(
                "Argon2 parallelism must be between 1 and {MAX_PARALLELISM} (got {})",
                self.parallelism
            )));
        }
        Ok(())
    }
}

/// Derive a storage key from a passphrase and salt using Argon2id.
///
/// The same passphrase + salt + params will always produce the same key.
pub fn derive_key(passphrase: &[u8], salt: &[u8], argon2_params: &Argon2Params) -> Result<StorageKey> {
    argon2_params.validate()?;

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| PwdmError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut bytes = [0u8; KEY_LEN];
    let hashed = argon2
        .hash_password_into(passphrase, salt, &mut bytes)
        .map_err(|e| PwdmError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")));
    if let Err(e) = hashed {
        bytes.zeroize();
        return Err(e);
    }

    let key = StorageKey::new(bytes);
    bytes.zeroize();
    Ok(key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Argon2Params {
        Argon2Params {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn default_params_are_valid() {
        assert!(Argon2Params::default().validate().is_ok());
    }

    #[test]
    fn rejects_weak_memory() {
        let params = Argon2Params {
            memory_kib: 1_024,
            ..fast()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_oversized_memory() {
        let params = Argon2Params {
            memory_kib: MAX_MEMORY_KIB + 1,
            ..fast()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_zero_iterations_and_lanes() {
        assert!(Argon2Params { iterations: 0, ..fast() }.validate().is_err());
        assert!(Argon2Params { parallelism: 0, ..fast() }.validate().is_err());
    }

    #[test]
    fn same_inputs_same_key() {
        let salt = generate_salt();
        let a = derive_key(b"hunter2", &salt, &fast()).unwrap();
        let b = derive_key(b"hunter2", &salt, &fast()).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
