//! File persistence for vaults.
//!
//! `VaultStore` ties the payload format and the crypto envelope to the
//! filesystem.  It holds no vault state of its own: callers pass the
//! path, passphrase and vault on every call.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::entries::Vault;
use super::format::{decode_payload, encode_payload};
use crate::crypto::envelope;
use crate::crypto::kdf::Argon2Params;
use crate::errors::{PwdmError, Result};

/// Extension carried by every storage file (without the dot).
pub const STORAGE_EXTENSION: &str = "pwdm";

/// Reads and writes encrypted storage files.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaultStore {
    /// KDF parameters used when sealing.  Opening always uses the
    /// parameters recorded in the file itself.
    params: Argon2Params,
}

impl VaultStore {
    /// Create a store that seals with the given Argon2 parameters.
    pub fn new(params: Argon2Params) -> Self {
        Self { params }
    }

    /// Initialize a new, empty storage file at `path`.
    ///
    /// Refuses to overwrite an existing file.
    pub fn create(&self, path: &Path, passphrase: &[u8]) -> Result<Vault> {
        let path = storage_path(path);
        if path.exists() {
            return Err(PwdmError::StorageAlreadyExists(path));
        }

        let vault = Vault::new();
        self.save(&path, passphrase, &vault)?;
        Ok(vault)
    }

    /// Serialize, encrypt and atomically write `vault` to `path`.
    pub fn save(&self, path: &Path, passphrase: &[u8], vault: &Vault) -> Result<()> {
        let path = storage_path(path);

        let payload = encode_payload(vault)?;
        let blob = envelope::seal(passphrase, &payload, &self.params)?;
        drop(payload);

        write_atomic(&path, &blob)?;
        debug!(path = %path.display(), entries = vault.len(), "storage saved");
        Ok(())
    }

    /// Read, decrypt and deserialize the storage at `path`.
    pub fn load(&self, path: &Path, passphrase: &[u8]) -> Result<Vault> {
        let path = storage_path(path);

        let blob = match fs::read(&path) {
            Ok(blob) => blob,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PwdmError::StorageNotFound(path));
            }
            Err(e) => return Err(e.into()),
        };

        let payload = envelope::open(passphrase, &blob).map_err(|e| {
            warn!(path = %path.display(), "storage failed to authenticate");
            e
        })?;
        let vault = decode_payload(&payload)?;

        debug!(path = %path.display(), entries = vault.len(), "storage loaded");
        Ok(vault)
    }
}

/// Append the storage extension to `name` unless it already carries it.
///
/// `work` becomes `work.pwdm`; `work.pwdm` is left alone; `work.old`
/// becomes `work.old.pwdm`.
pub fn storage_path(name: impl AsRef<Path>) -> PathBuf {
    let name = name.as_ref();
    if name.extension().is_some_and(|ext| ext == STORAGE_EXTENSION) {
        return name.to_path_buf();
    }

    let mut with_ext = OsString::from(name.as_os_str());
    with_ext.push(".");
    with_ext.push(STORAGE_EXTENSION);
    PathBuf::from(with_ext)
}

/// Names of all storage files in `dir`, sorted.
pub fn list_storages(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == STORAGE_EXTENSION) {
            if let Some(file_name) = path.file_name() {
                names.push(file_name.to_string_lossy().to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Write `data` to `path` **atomically**.
///
/// 1. Write to a temp file in the same directory (owner-only on Unix).
/// 2. Flush it to disk.
/// 3. Rename the temp file over the target path.
///
/// Readers see either the old file or the new one, never a partial write.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let written = write_temp(&tmp_path, data).and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}

fn write_temp(tmp_path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(tmp_path)?;
    file.write_all(data)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn storage_path_appends_extension_once() {
        assert_eq!(storage_path("work"), PathBuf::from("work.pwdm"));
        assert_eq!(storage_path("work.pwdm"), PathBuf::from("work.pwdm"));
        assert_eq!(storage_path("work.old"), PathBuf::from("work.old.pwdm"));
        assert_eq!(
            storage_path("/tmp/dir/home"),
            PathBuf::from("/tmp/dir/home.pwdm")
        );
    }

    #[test]
    fn save_seals_with_configured_params() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("work.pwdm");
        let params = Argon2Params {
            memory_kib: 8_192,
            iterations: 2,
            parallelism: 1,
        };

        VaultStore::new(params).create(&path, b"pw").unwrap();
        let blob = fs::read(&path).unwrap();
        assert_eq!(envelope::sealed_params(&blob).unwrap(), params);
    }

    #[test]
    fn list_storages_only_returns_storage_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("work.pwdm"), b"x").unwrap();
        fs::write(dir.path().join("home.pwdm"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("dir.pwdm")).unwrap();

        let names = list_storages(dir.path()).unwrap();
        assert_eq!(names, vec!["home.pwdm", "work.pwdm"]);
    }

    #[test]
    fn atomic_write_replaces_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.pwdm");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!dir.path().join(".a.pwdm.tmp").exists());
    }

    #[test]
    fn failed_write_leaves_target_intact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.pwdm");
        write_atomic(&path, b"original").unwrap();

        // Renaming onto a non-empty directory fails.
        let blocked = dir.path().join("blocked.pwdm");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("inner"), b"x").unwrap();
        assert!(write_atomic(&blocked, b"new").is_err());

        assert_eq!(fs::read(&path).unwrap(), b"original");
        assert!(!dir.path().join(".blocked.pwdm.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.pwdm");
        write_atomic(&path, b"data").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
