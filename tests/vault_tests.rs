//! Integration tests for the pwdm vault module.

use std::fs;

use pwdm::crypto::Argon2Params;
use pwdm::errors::PwdmError;
use pwdm::vault::{Vault, VaultSession, VaultStore, MAX_DESCRIPTION_LEN};
use tempfile::TempDir;
use zeroize::Zeroizing;

fn store() -> VaultStore {
    VaultStore::new(Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    })
}

fn pw(s: &str) -> Zeroizing<String> {
    Zeroizing::new(s.to_string())
}

/// Helper: a temp dir and the path of a storage inside it.
fn storage_path() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("work.pwdm");
    (dir, path)
}

// ---------------------------------------------------------------------------
// Store round-trip
// ---------------------------------------------------------------------------

#[test]
fn create_add_save_and_reload() {
    let (_dir, path) = storage_path();

    let mut session = VaultSession::create(store(), &path, pw("secret-pass")).unwrap();
    session.add("my mail", "hunter2").unwrap();
    session.save().unwrap();

    let reopened = VaultSession::open(store(), &path, pw("secret-pass")).unwrap();
    assert_eq!(reopened.vault().list(), vec!["my mail".to_string()]);
    assert_eq!(reopened.vault().get("my mail"), Some("hunter2"));
}

#[test]
fn storage_file_does_not_contain_plaintext() {
    let (_dir, path) = storage_path();

    let mut vault = Vault::new();
    vault.add("work", "hunter2").unwrap();
    store().save(&path, b"pw", &vault).unwrap();

    let raw = fs::read(&path).unwrap();
    assert!(raw.starts_with(b"PWDM"));
    assert!(!raw.windows(7).any(|w| w == b"hunter2"));
    assert!(!raw.windows(4).any(|w| w == b"work"));
}

#[test]
fn load_with_wrong_passphrase_fails() {
    let (_dir, path) = storage_path();
    store().create(&path, b"right").unwrap();

    let err = store().load(&path, b"wrong").unwrap_err();
    assert!(matches!(err, PwdmError::AuthenticationFailed));
}

#[test]
fn missing_storage_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = store()
        .load(&dir.path().join("absent.pwdm"), b"pw")
        .unwrap_err();
    assert!(err.is_io());
}

#[test]
fn create_refuses_to_overwrite() {
    let (_dir, path) = storage_path();
    store().create(&path, b"pw").unwrap();
    assert!(matches!(
        store().create(&path, b"other"),
        Err(PwdmError::StorageAlreadyExists(_))
    ));
    // The original file still opens with its own passphrase.
    assert!(store().load(&path, b"pw").unwrap().is_empty());
}

#[test]
fn unicode_entries_survive_reload() {
    let (_dir, path) = storage_path();

    let mut vault = Vault::new();
    vault.add("почта", "пароль ✓").unwrap();
    vault.add("", "empty description").unwrap();
    store().save(&path, "ключ".as_bytes(), &vault).unwrap();

    let loaded = store().load(&path, "ключ".as_bytes()).unwrap();
    assert_eq!(loaded, vault);
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[test]
fn find_matches_substrings() {
    let mut vault = Vault::new();
    vault.add("my mail", "a").unwrap();
    vault.add("my bank", "b").unwrap();
    vault.add("work", "c").unwrap();

    let found = vault.find("my").unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found["my mail"], "a");
    assert_eq!(found["my bank"], "b");

    assert_eq!(vault.find("").unwrap().len(), 3);
    assert!(vault.find("nothing").unwrap().is_empty());
}

#[test]
fn description_length_limit() {
    let mut vault = Vault::new();

    let longest = "x".repeat(MAX_DESCRIPTION_LEN);
    vault.add(&longest, "ok").unwrap();

    let too_long = "y".repeat(MAX_DESCRIPTION_LEN + 1);
    let err = vault.add(&too_long, "no").unwrap_err();
    assert!(err.is_validation());
    assert_eq!(vault.len(), 1);
}

#[test]
fn duplicate_description_is_rejected() {
    let mut vault = Vault::new();
    vault.add("work", "first").unwrap();

    let err = vault.add("work", "second").unwrap_err();
    assert!(matches!(err, PwdmError::DuplicateDescription(ref d) if d == "work"));
    assert_eq!(vault.get("work"), Some("first"));
}

#[test]
fn delete_declined_keeps_everything() {
    let mut vault = Vault::new();
    vault.add("my mail", "a").unwrap();
    vault.add("my bank", "b").unwrap();

    assert_eq!(vault.delete("my", |_| false).unwrap(), 0);
    assert_eq!(vault.len(), 2);
}

#[test]
fn delete_accepted_removes_all_matches() {
    let mut vault = Vault::new();
    vault.add("my mail", "a").unwrap();
    vault.add("my bank", "b").unwrap();
    vault.add("work", "c").unwrap();

    let mut asked = Vec::new();
    let removed = vault
        .delete("my", |d| {
            asked.push(d.to_string());
            true
        })
        .unwrap();

    assert_eq!(removed, 2);
    assert_eq!(asked, vec!["my bank".to_string(), "my mail".to_string()]);
    assert_eq!(vault.list(), vec!["work".to_string()]);
}

// ---------------------------------------------------------------------------
// Passphrase change
// ---------------------------------------------------------------------------

#[test]
fn change_passphrase_reencrypts() {
    let (_dir, path) = storage_path();

    let mut session = VaultSession::create(store(), &path, pw("old")).unwrap();
    session.add("work", "hunter2").unwrap();
    session.change_passphrase("old", pw("new")).unwrap();

    assert!(VaultSession::open(store(), &path, pw("old")).is_err());
    let reopened = VaultSession::open(store(), &path, pw("new")).unwrap();
    assert_eq!(reopened.vault().get("work"), Some("hunter2"));
}

#[test]
fn failed_change_passphrase_leaves_storage_intact() {
    let (_dir, path) = storage_path();

    let mut session = VaultSession::create(store(), &path, pw("old")).unwrap();
    session.add("work", "hunter2").unwrap();
    session.save().unwrap();
    let before = fs::read(&path).unwrap();

    let err = session.change_passphrase("not-old", pw("new")).unwrap_err();
    assert!(matches!(err, PwdmError::AuthenticationFailed));
    assert_eq!(fs::read(&path).unwrap(), before);

    // The session still saves under the original passphrase.
    session.save().unwrap();
    assert!(VaultSession::open(store(), &path, pw("old")).is_ok());
}
