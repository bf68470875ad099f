use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{PwdmError, Result};

/// Project-level configuration, loaded from `.pwdm.toml`.
///
/// Every field has a sensible default so pwdm works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory where storage files are created and looked up.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// How many enter/confirm rounds a new passphrase gets (0 = unlimited).
    #[serde(default = "default_passphrase_attempts")]
    pub passphrase_attempts: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_storage_dir() -> String {
    ".".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_passphrase_attempts() -> usize {
    3
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            passphrase_attempts: default_passphrase_attempts(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".pwdm.toml";

    /// Load settings from `<project_dir>/.pwdm.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PwdmError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.argon2_params().validate().map_err(|e| {
            PwdmError::ConfigError(format!("{}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Resolve the storage directory against `project_dir`.
    pub fn storage_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.storage_dir)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> crate::crypto::kdf::Argon2Params {
        crate::crypto::kdf::Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// Attempt limit for `passphrase::acquire_new`.
    pub fn passphrase_attempts(&self) -> Option<usize> {
        match self.passphrase_attempts {
            0 => None,
            n => Some(n),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.storage_dir, ".");
        assert_eq!(s.argon2_memory_kib, 65_536);
        assert_eq!(s.argon2_iterations, 3);
        assert_eq!(s.argon2_parallelism, 4);
        assert_eq!(s.passphrase_attempts(), Some(3));
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.storage_dir, ".");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
storage_dir = "secrets"
argon2_memory_kib = 131072
argon2_iterations = 5
argon2_parallelism = 8
passphrase_attempts = 0
"#;
        fs::write(tmp.path().join(".pwdm.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.storage_dir, "secrets");
        assert_eq!(settings.argon2_memory_kib, 131_072);
        assert_eq!(settings.argon2_iterations, 5);
        assert_eq!(settings.argon2_parallelism, 8);
        assert_eq!(settings.passphrase_attempts(), None);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".pwdm.toml"), "argon2_iterations = 1\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.argon2_iterations, 1);
        assert_eq!(settings.storage_dir, ".");
        assert_eq!(settings.argon2_memory_kib, 65_536);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".pwdm.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(PwdmError::ConfigError(_))));
    }

    #[test]
    fn load_errors_on_weak_argon2_params() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".pwdm.toml"), "argon2_memory_kib = 16\n").unwrap();

        assert!(matches!(
            Settings::load(tmp.path()),
            Err(PwdmError::ConfigError(_))
        ));
    }

    #[test]
    fn storage_dir_resolves_against_project() {
        let s = Settings {
            storage_dir: "secrets".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            s.storage_dir(Path::new("/home/user/project")),
            PathBuf::from("/home/user/project/secrets")
        );
    }
}
