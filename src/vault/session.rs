//! One open storage: the decrypted vault, its file and its passphrase.
//!
//! A `VaultSession` only exists once a storage has been created or
//! loaded, so "no storage loaded" is simply the absence of a session
//! (`Option<VaultSession>` in the caller).  Every method either succeeds
//! or leaves the session exactly as it was.

use std::path::{Path, PathBuf};

use subtle::ConstantTimeEq;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::entries::Vault;
use super::store::{storage_path, VaultStore};
use crate::errors::{PwdmError, Result};

/// The caller-owned state of an open storage.
pub struct VaultSession {
    store: VaultStore,
    path: PathBuf,
    passphrase: Zeroizing<String>,
    vault: Vault,
    dirty: bool,
}

impl VaultSession {
    /// Create a new, empty storage file and open a session on it.
    pub fn create(store: VaultStore, name: &Path, passphrase: Zeroizing<String>) -> Result<Self> {
        let path = storage_path(name);
        let vault = store.create(&path, passphrase.as_bytes())?;
        info!(path = %path.display(), "storage created");

        Ok(Self {
            store,
            path,
            passphrase,
            vault,
            dirty: false,
        })
    }

    /// Decrypt an existing storage file and open a session on it.
    pub fn open(store: VaultStore, name: &Path, passphrase: Zeroizing<String>) -> Result<Self> {
        let path = storage_path(name);
        let vault = store.load(&path, passphrase.as_bytes())?;

        Ok(Self {
            store,
            path,
            passphrase,
            vault,
            dirty: false,
        })
    }

    /// Persist the in-memory vault under the session passphrase.
    pub fn save(&mut self) -> Result<()> {
        self.store
            .save(&self.path, self.passphrase.as_bytes(), &self.vault)?;
        self.dirty = false;
        Ok(())
    }

    /// Add an entry in memory.  Not persisted until `save`.
    pub fn add(&mut self, description: &str, secret: &str) -> Result<()> {
        self.vault.add(description, secret)?;
        self.dirty = true;
        Ok(())
    }

    /// Delete confirmed matches in memory.  Not persisted until `save`.
    pub fn delete<F>(&mut self, pattern: &str, confirm: F) -> Result<usize>
    where
        F: FnMut(&str) -> bool,
    {
        let removed = self.vault.delete(pattern, confirm)?;
        if removed > 0 {
            self.dirty = true;
        }
        debug!(removed, "entries deleted in memory");
        Ok(removed)
    }

    /// Re-encrypt the storage under a new passphrase.
    ///
    /// `old` must match the passphrase the session was opened with.  The
    /// whole current map is sealed under `new` and written atomically
    /// before the session adopts `new`, so this also saves any pending
    /// changes.  On failure nothing changes.
    pub fn change_passphrase(&mut self, old: &str, new: Zeroizing<String>) -> Result<()> {
        if !bool::from(old.as_bytes().ct_eq(self.passphrase.as_bytes())) {
            return Err(PwdmError::AuthenticationFailed);
        }

        self.store.save(&self.path, new.as_bytes(), &self.vault)?;
        self.passphrase = new;
        self.dirty = false;

        info!(path = %self.path.display(), "storage passphrase changed");
        Ok(())
    }

    /// The decrypted vault.
    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Path of the backing storage file (always ends in `.pwdm`).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if there are in-memory changes that have not been saved.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("path", &self.path)
            .field("passphrase", &"[REDACTED]")
            .field("vault", &self.vault)
            .field("dirty", &self.dirty)
            .finish()
    }
}
