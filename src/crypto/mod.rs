//! Cryptographic primitives for pwdm.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Argon2id passphrase-based key derivation (`kdf`)
//! - A zeroize-on-drop key holder (`keys`)
//! - The passphrase-sealed blob format built on top of them (`envelope`)

pub mod encryption;
pub mod envelope;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, Argon2Params};
pub use envelope::{open, seal};
pub use kdf::{derive_key, generate_salt, Argon2Params};
pub use keys::StorageKey;
