//! Zeroizing holder for derived storage keys.

use zeroize::Zeroize;

/// Length of a storage key (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A wrapper around a 32-byte storage key that automatically zeroes
/// its memory when dropped.
///
/// Keys are re-derived from the passphrase for every seal/open, so a
/// `StorageKey` only lives for the duration of one envelope operation.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct StorageKey {
    bytes: [u8; KEY_LEN],
}

impl StorageKey {
    /// Create a new `StorageKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
