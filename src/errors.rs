use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in pwdm.
#[derive(Debug, Error)]
pub enum PwdmError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Wrong passphrase, tampered blob and malformed blob all end up here.
    #[error("Wrong passphrase or corrupted storage")]
    AuthenticationFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Storage errors ---
    #[error("Storage not found at {0}")]
    StorageNotFound(PathBuf),

    #[error("Storage already exists at {0}")]
    StorageAlreadyExists(PathBuf),

    #[error("You must load storage from file or create new")]
    NoStorageLoaded,

    // --- Validation errors ---
    #[error("Too long description ({len} characters, at most {max} allowed)")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("Description '{0}' exists already in current storage")]
    DuplicateDescription(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Passphrases did not match")]
    PassphraseMismatch,
}

impl PwdmError {
    /// Returns `true` for the I/O family (missing, unreadable, unwritable file).
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::StorageNotFound(_))
    }

    /// Returns `true` for input that the vault refused to accept.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DescriptionTooLong { .. } | Self::DuplicateDescription(_)
        )
    }
}

/// Convenience type alias for pwdm results.
pub type Result<T> = std::result::Result<T, PwdmError>;
