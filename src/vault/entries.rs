//! In-memory description -> secret map and its CRUD rules.
//!
//! Nothing here touches the disk.  Mutations are only persisted when the
//! owning session saves, so quitting without saving undoes them.

use std::collections::{BTreeMap, HashMap};

use zeroize::Zeroize;

use crate::errors::{PwdmError, Result};

/// Maximum length of a description (and of a search pattern), in characters.
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// The decrypted contents of one storage file.
///
/// Secret values are wiped from memory when the vault is dropped.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Vault {
    entries: HashMap<String, String>,
}

impl Vault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vault from already-decoded entries.
    ///
    /// Every description must satisfy the same length limit as `add`.
    pub fn from_entries(entries: HashMap<String, String>) -> Result<Self> {
        let vault = Self { entries };
        for description in vault.entries.keys() {
            validate_length(description)?;
        }
        Ok(vault)
    }

    /// All descriptions, sorted for stable display.
    ///
    /// An empty result is not an error; use `is_empty` to tell the user.
    pub fn list(&self) -> Vec<String> {
        let mut descriptions: Vec<String> = self.entries.keys().cloned().collect();
        descriptions.sort();
        descriptions
    }

    /// Every entry whose description contains `pattern`.
    ///
    /// An empty pattern matches everything.
    pub fn find(&self, pattern: &str) -> Result<BTreeMap<String, String>> {
        validate_length(pattern)?;

        Ok(self
            .entries
            .iter()
            .filter(|(description, _)| description.contains(pattern))
            .map(|(description, secret)| (description.clone(), secret.clone()))
            .collect())
    }

    /// Insert a new entry.
    ///
    /// Fails without touching the map if the description is too long or
    /// already present.
    pub fn add(&mut self, description: &str, secret: &str) -> Result<()> {
        self.check_new_description(description)?;
        self.entries
            .insert(description.to_string(), secret.to_string());
        Ok(())
    }

    /// Check that `add` would accept `description`, without inserting.
    pub fn check_new_description(&self, description: &str) -> Result<()> {
        validate_length(description)?;
        if self.entries.contains_key(description) {
            return Err(PwdmError::DuplicateDescription(description.to_string()));
        }
        Ok(())
    }

    /// Remove the entries matching `pattern` that `confirm` approves.
    ///
    /// `confirm` is asked once per matching description, in sorted order.
    /// Returns how many entries were actually removed.
    pub fn delete<F>(&mut self, pattern: &str, mut confirm: F) -> Result<usize>
    where
        F: FnMut(&str) -> bool,
    {
        validate_length(pattern)?;

        let mut matching: Vec<String> = self
            .entries
            .keys()
            .filter(|description| description.contains(pattern))
            .cloned()
            .collect();
        matching.sort();

        let mut removed = 0;
        for description in matching {
            if !confirm(&description) {
                continue;
            }
            if let Some(mut secret) = self.entries.remove(&description) {
                secret.zeroize();
                removed += 1;
            }
        }

        Ok(removed)
    }

    /// Look up the secret stored under an exact description.
    pub fn get(&self, description: &str) -> Option<&str> {
        self.entries.get(description).map(String::as_str)
    }

    /// Returns `true` if an entry with exactly this description exists.
    pub fn contains(&self, description: &str) -> bool {
        self.entries.contains_key(description)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the vault holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by description, for deterministic serialization.
    pub(crate) fn sorted_entries(&self) -> BTreeMap<&str, &str> {
        self.entries
            .iter()
            .map(|(d, s)| (d.as_str(), s.as_str()))
            .collect()
    }
}

impl Drop for Vault {
    fn drop(&mut self) {
        for secret in self.entries.values_mut() {
            secret.zeroize();
        }
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("descriptions", &self.list())
            .field("secrets", &"[REDACTED]")
            .finish()
    }
}

fn validate_length(text: &str) -> Result<()> {
    let len = text.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(PwdmError::DescriptionTooLong {
            len,
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(())
}
