//! Passphrase-sealed envelope around an opaque payload.
//!
//! A blob has this layout:
//!
//! ```text
//! [PWDM: 4][version: 1][memory_kib: 4 LE][iterations: 4 LE][parallelism: 4 LE][salt: 32][nonce: 12][ciphertext + tag]
//! ```
//!
//! Everything before the nonce is the header.  It is passed to AES-GCM as
//! associated data, so the stored KDF parameters and salt are covered by
//! the same tag as the payload.
//!
//! `open` reports every failure as `AuthenticationFailed`: a wrong
//! passphrase, a flipped bit and a truncated file all produce the same
//! error value (though not the same running time, see `open`).

use zeroize::Zeroizing;

use super::encryption::{self, NONCE_LEN, TAG_LEN};
use super::kdf::{derive_key, generate_salt, Argon2Params, SALT_LEN};
use crate::errors::{PwdmError, Result};

/// Magic bytes at the start of every blob.
const MAGIC: &[u8; 4] = b"PWDM";

/// Current envelope format version.
pub const CURRENT_VERSION: u8 = 1;

/// 4 (magic) + 1 (version) + 3 * 4 (Argon2 params) + salt.
const HEADER_LEN: usize = 4 + 1 + 12 + SALT_LEN;

/// Smallest blob that can possibly authenticate (empty payload).
pub const MIN_BLOB_LEN: usize = HEADER_LEN + NONCE_LEN + TAG_LEN;

/// Encrypt `plaintext` under a key derived from `passphrase`.
///
/// A fresh salt and nonce are drawn on every call, so sealing the same
/// payload twice never yields the same blob.
pub fn seal(passphrase: &[u8], plaintext: &[u8], params: &Argon2Params) -> Result<Vec<u8>> {
    let salt = generate_salt();
    let header = encode_header(params, &salt);

    let key = derive_key(passphrase, &salt, params)?;
    let body = encryption::encrypt(key.as_bytes(), plaintext, &header)?;
    drop(key);

    let mut blob = Vec::with_capacity(header.len() + body.len());
    blob.extend_from_slice(&header);
    blob.extend_from_slice(&body);
    Ok(blob)
}

/// Decrypt a blob produced by `seal`.
///
/// Every failure is reported as `AuthenticationFailed`, but only the error
/// kind is uniform. A truncated or malformed header is rejected before any
/// key derivation, so it fails much faster than a wrong passphrase, and a
/// caller timing `open` can tell the two apart.
pub fn open(passphrase: &[u8], blob: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if blob.len() < MIN_BLOB_LEN {
        return Err(PwdmError::AuthenticationFailed);
    }

    let (header, body) = blob.split_at(HEADER_LEN);
    let (params, salt) = decode_header(header)?;

    // Out-of-range parameters can only come from a damaged or forged file.
    let key = derive_key(passphrase, salt, &params).map_err(|_| PwdmError::AuthenticationFailed)?;
    encryption::decrypt(key.as_bytes(), body, header)
}

/// Read the KDF parameters a blob was sealed with, without decrypting it.
pub fn sealed_params(blob: &[u8]) -> Result<Argon2Params> {
    if blob.len() < MIN_BLOB_LEN {
        return Err(PwdmError::AuthenticationFailed);
    }
    decode_header(&blob[..HEADER_LEN]).map(|(params, _)| params)
}

fn encode_header(params: &Argon2Params, salt: &[u8; SALT_LEN]) -> Vec<u8> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    header.extend_from_slice(MAGIC); // 4 bytes
    header.push(CURRENT_VERSION); // 1 byte
    header.extend_from_slice(&params.memory_kib.to_le_bytes());
    header.extend_from_slice(&params.iterations.to_le_bytes());
    header.extend_from_slice(&params.parallelism.to_le_bytes());
    header.extend_from_slice(salt);
    header
}

fn decode_header(header: &[u8]) -> Result<(Argon2Params, &[u8])> {
    if header.len() != HEADER_LEN || &header[0..4] != MAGIC || header[4] != CURRENT_VERSION {
        return Err(PwdmError::AuthenticationFailed);
    }

    let params = Argon2Params {
        memory_kib: read_u32(&header[5..9])?,
        iterations: read_u32(&header[9..13])?,
        parallelism: read_u32(&header[13..17])?,
    };
    params
        .validate()
        .map_err(|_| PwdmError::AuthenticationFailed)?;

    Ok((params, &header[17..]))
}

fn read_u32(bytes: &[u8]) -> Result<u32> {
    bytes
        .try_into()
        .map(u32::from_le_bytes)
        .map_err(|_| PwdmError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::MIN_MEMORY_KIB;

    fn fast() -> Argon2Params {
        Argon2Params {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn header_records_params() {
        let blob = seal(b"pw", b"{}", &fast()).unwrap();
        assert_eq!(&blob[0..4], b"PWDM");
        assert_eq!(blob[4], CURRENT_VERSION);
        assert_eq!(sealed_params(&blob).unwrap(), fast());
    }

    #[test]
    fn empty_payload_roundtrip() {
        let blob = seal(b"pw", b"", &fast()).unwrap();
        assert_eq!(blob.len(), MIN_BLOB_LEN);
        assert!(open(b"pw", &blob).unwrap().is_empty());
    }

    #[test]
    fn tampered_params_fail_authentication() {
        let mut blob = seal(b"pw", b"{}", &fast()).unwrap();
        // Bump iterations from 1 to 2: still a valid range, but not what was sealed.
        blob[9] = 2;
        assert!(matches!(
            open(b"pw", &blob),
            Err(PwdmError::AuthenticationFailed)
        ));
    }

    #[test]
    fn absurd_params_fail_authentication_without_deriving() {
        let mut blob = seal(b"pw", b"{}", &fast()).unwrap();
        blob[5..9].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            open(b"pw", &blob),
            Err(PwdmError::AuthenticationFailed)
        ));
    }

    #[test]
    fn bad_magic_and_version_fail_authentication() {
        let blob = seal(b"pw", b"{}", &fast()).unwrap();

        let mut bad_magic = blob.clone();
        bad_magic[0] = b'X';
        assert!(matches!(
            open(b"pw", &bad_magic),
            Err(PwdmError::AuthenticationFailed)
        ));

        let mut bad_version = blob.clone();
        bad_version[4] = 99;
        assert!(matches!(
            open(b"pw", &bad_version),
            Err(PwdmError::AuthenticationFailed)
        ));

        // Same error value as a wrong passphrase on an intact header.
        let wrong = open(b"not-pw", &blob).unwrap_err();
        let malformed = open(b"pw", &bad_magic).unwrap_err();
        assert_eq!(wrong.to_string(), malformed.to_string());
    }
}
