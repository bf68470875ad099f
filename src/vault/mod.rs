//! Vault module: the secret map and its encrypted storage.
//!
//! This module provides:
//! - The in-memory `Vault` and its CRUD rules (`entries`)
//! - The JSON payload sealed inside each storage file (`format`)
//! - `VaultStore` for creating, loading and saving storage files (`store`)
//! - `VaultSession`, one open storage with its passphrase (`session`)

pub mod entries;
pub mod format;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use entries::{Vault, MAX_DESCRIPTION_LEN};
pub use session::VaultSession;
pub use store::{list_storages, storage_path, VaultStore, STORAGE_EXTENSION};
