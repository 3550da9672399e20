//! Integration tests for the SecureVault vault module.

use std::fs;

use securevault::crypto::{encrypt, generate_iv, generate_salt};
use securevault::errors::VaultError;
use securevault::vault::{CredentialEntry, Note, VaultFile, VaultStore};
use tempfile::TempDir;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Helper: create a temporary vault file path inside a fresh temp dir.
fn vault_path() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("vault.json");
    (dir, path)
}

// ---------------------------------------------------------------------------
// Create, save and reload
// ---------------------------------------------------------------------------

#[test]
fn add_save_and_reload_entry() {
    let (_dir, path) = vault_path();

    let mut store = VaultStore::new(b"hunter2").expect("create vault");
    store.add_entry("gmail.com", "alice", "pw1").unwrap();
    store.save_to_file(&path).unwrap();

    let reopened = VaultStore::load_from_file(&path, b"hunter2").expect("reload");
    assert_eq!(
        reopened.get_entries().unwrap(),
        vec![CredentialEntry::new("gmail.com", "alice", "pw1")]
    );
}

#[test]
fn two_entries_reload_in_order_and_reject_wrong_password() {
    let (_dir, path) = vault_path();

    let mut store = VaultStore::new(b"hunter2").unwrap();
    store.add_entry("gmail.com", "alice", "pw1").unwrap();
    store.add_entry("github.com", "alice", "pw2").unwrap();
    store.save_to_file(&path).unwrap();

    let reopened = VaultStore::load_from_file(&path, b"hunter2").unwrap();
    assert_eq!(
        reopened.get_entries().unwrap(),
        vec![
            CredentialEntry::new("gmail.com", "alice", "pw1"),
            CredentialEntry::new("github.com", "alice", "pw2"),
        ]
    );

    let wrong = VaultStore::load_from_file(&path, b"wrong").unwrap();
    assert!(matches!(
        wrong.get_entries(),
        Err(VaultError::DecryptionFailed)
    ));
}

#[test]
fn saved_file_has_expected_shape() {
    let (_dir, path) = vault_path();

    let mut store = VaultStore::new(b"hunter2").unwrap();
    store.add_entry("gmail.com", "alice", "pw1").unwrap();
    store.add_note("wifi", "pass: 1234").unwrap();
    store.save_to_file(&path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

    let salt = BASE64.decode(json["salt"].as_str().unwrap()).unwrap();
    assert_eq!(salt.len(), 16);

    let entry = &json["entries"][0];
    assert_eq!(entry["website"], "gmail.com");
    assert_ne!(entry["username"], "alice");
    assert_ne!(entry["password"], "pw1");
    assert!(BASE64.decode(entry["password"].as_str().unwrap()).is_ok());

    // Note content is ciphertext on disk.
    assert_eq!(json["notes"][0]["title"], "wifi");
    assert_ne!(json["notes"][0]["content"], "pass: 1234");
}

#[test]
fn entries_and_notes_keep_insertion_order() {
    let mut store = VaultStore::new(b"pw").unwrap();
    store.add_entry("a.com", "u1", "p1").unwrap();
    store.add_entry("b.com", "u2", "p2").unwrap();
    store.add_entry("c.com", "u3", "p3").unwrap();
    store.add_note("first", "1").unwrap();
    store.add_note("second", "2").unwrap();

    let sites: Vec<_> = store
        .get_entries()
        .unwrap()
        .into_iter()
        .map(|e| e.site)
        .collect();
    assert_eq!(sites, ["a.com", "b.com", "c.com"]);

    let titles: Vec<_> = store
        .get_notes()
        .unwrap()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(titles, ["first", "second"]);
}

#[test]
fn save_leaves_in_memory_state_intact() {
    let (_dir, path) = vault_path();

    let mut store = VaultStore::new(b"pw").unwrap();
    store.add_entry("x.com", "u", "p").unwrap();
    store.save_to_file(&path).unwrap();
    store.save_to_file(&path).unwrap();

    assert_eq!(store.entry_count(), 1);
    assert_eq!(
        VaultStore::load_from_file(&path, b"pw")
            .unwrap()
            .entry_count(),
        1
    );
}

// ---------------------------------------------------------------------------
// Wrong password and malformed files
// ---------------------------------------------------------------------------

#[test]
fn wrong_password_fails_on_first_read() {
    let (_dir, path) = vault_path();

    let mut store = VaultStore::new(b"hunter2").unwrap();
    store
        .add_entry("gmail.com", "alice", "a-long-enough-password-value")
        .unwrap();
    store.save_to_file(&path).unwrap();

    // Loading is lazy: the key is derived but nothing is decrypted yet.
    let wrong = VaultStore::load_from_file(&path, b"wrong").expect("load is lazy");
    assert!(matches!(
        wrong.get_entries(),
        Err(VaultError::DecryptionFailed)
    ));
    assert!(matches!(wrong.verify(), Err(VaultError::DecryptionFailed)));
}

#[test]
fn empty_vault_accepts_any_password() {
    let (_dir, path) = vault_path();

    VaultStore::new(b"hunter2")
        .unwrap()
        .save_to_file(&path)
        .unwrap();

    let store = VaultStore::load_from_file(&path, b"anything").unwrap();
    assert!(store.verify().is_ok());
    assert!(store.get_entries().unwrap().is_empty());
    assert!(store.get_notes().unwrap().is_empty());
}

#[test]
fn missing_file_reports_not_found() {
    let (_dir, path) = vault_path();
    let result = VaultStore::load_from_file(&path, b"pw");
    assert!(matches!(result, Err(VaultError::VaultNotFound(_))));
}

#[test]
fn malformed_file_reports_invalid_format() {
    let (_dir, path) = vault_path();
    fs::write(&path, "{ this is not json").unwrap();

    let result = VaultStore::load_from_file(&path, b"pw");
    assert!(matches!(result, Err(VaultError::InvalidVaultFormat(_))));
}

#[test]
fn file_without_notes_array_loads() {
    let (_dir, path) = vault_path();
    let salt = BASE64.encode(generate_salt());
    fs::write(
        &path,
        format!(r#"{{ "version": 2, "salt": "{salt}", "entries": [] }}"#),
    )
    .unwrap();

    let store = VaultStore::load_from_file(&path, b"pw").unwrap();
    assert_eq!(store.note_count(), 0);
}

#[test]
fn unknown_top_level_fields_are_ignored() {
    let (_dir, path) = vault_path();
    let salt = BASE64.encode(generate_salt());
    fs::write(
        &path,
        format!(
            r#"{{ "version": 2, "salt": "{salt}", "entries": [], "notes": [],
                 "created_by": "someone" }}"#
        ),
    )
    .unwrap();

    assert!(VaultStore::load_from_file(&path, b"pw").is_ok());
}

// ---------------------------------------------------------------------------
// Entry operations
// ---------------------------------------------------------------------------

#[test]
fn duplicate_sites_coexist() {
    let mut store = VaultStore::new(b"pw").unwrap();
    store.add_entry("gmail.com", "alice", "pw1").unwrap();
    store.add_entry("gmail.com", "bob", "pw2").unwrap();

    assert_eq!(store.entry_count(), 2);
    let found = store.find_entry("gmail.com").unwrap().unwrap();
    assert_eq!(found.username, "alice");
}

#[test]
fn edit_entry_replaces_first_match_in_place() {
    let mut store = VaultStore::new(b"pw").unwrap();
    store.add_entry("a.com", "u1", "p1").unwrap();
    store.add_entry("b.com", "u2", "p2").unwrap();

    assert!(store.edit_entry("a.com", "z.com", "u9", "p9").unwrap());

    let entries = store.get_entries().unwrap();
    assert_eq!(entries[0], CredentialEntry::new("z.com", "u9", "p9"));
    assert_eq!(entries[1], CredentialEntry::new("b.com", "u2", "p2"));
}

#[test]
fn edit_missing_entry_is_a_no_op() {
    let mut store = VaultStore::new(b"pw").unwrap();
    store.add_entry("a.com", "u1", "p1").unwrap();
    let before = store.stored_entries().to_vec();

    assert!(!store.edit_entry("nope.com", "x", "y", "z").unwrap());
    assert_eq!(store.stored_entries(), before.as_slice());
}

#[test]
fn remove_entry_removes_all_matches_and_is_idempotent() {
    let mut store = VaultStore::new(b"pw").unwrap();
    store.add_entry("gmail.com", "alice", "pw1").unwrap();
    store.add_entry("other.com", "carol", "pw3").unwrap();
    store.add_entry("gmail.com", "bob", "pw2").unwrap();

    assert!(store.remove_entry_by_site("gmail.com"));
    assert!(!store.remove_entry_by_site("gmail.com"));

    let entries = store.get_entries().unwrap();
    assert_eq!(entries, vec![CredentialEntry::new("other.com", "carol", "pw3")]);
}

// ---------------------------------------------------------------------------
// Note operations
// ---------------------------------------------------------------------------

#[test]
fn note_crud() {
    let mut store = VaultStore::new(b"pw").unwrap();
    store.add_note("wifi", "pass: 1234").unwrap();
    assert!(store.contains_title("wifi"));

    assert!(store.edit_note("wifi", "home wifi", "pass: 5678").unwrap());
    assert_eq!(
        store.get_notes().unwrap(),
        vec![Note::new("home wifi", "pass: 5678")]
    );

    assert!(!store.edit_note("wifi", "x", "y").unwrap());
    assert!(store.remove_note_by_title("home wifi"));
    assert!(!store.remove_note_by_title("home wifi"));
    assert_eq!(store.note_count(), 0);
}

#[test]
fn notes_survive_reload() {
    let (_dir, path) = vault_path();

    let mut store = VaultStore::new(b"pw").unwrap();
    store.add_note("recovery codes", "1111 2222 3333").unwrap();
    store.save_to_file(&path).unwrap();

    let reopened = VaultStore::load_from_file(&path, b"pw").unwrap();
    let note = reopened.find_note("recovery codes").unwrap().unwrap();
    assert_eq!(note.content, "1111 2222 3333");
    assert!(reopened.find_note("absent").unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Master password rotation
// ---------------------------------------------------------------------------

#[test]
fn rotation_preserves_plaintext_and_changes_ciphertext() {
    let (_dir, path) = vault_path();

    let mut store = VaultStore::new(b"old-password").unwrap();
    store.add_entry("gmail.com", "alice", "pw1").unwrap();
    store.add_entry("bank.com", "bob", "pw2").unwrap();
    store.add_note("wifi", "pass: 1234").unwrap();

    let entries_before = store.get_entries().unwrap();
    let notes_before = store.get_notes().unwrap();
    let stored_before = store.stored_entries().to_vec();

    store.change_master_password(b"new-password").unwrap();

    assert_eq!(store.get_entries().unwrap(), entries_before);
    assert_eq!(store.get_notes().unwrap(), notes_before);
    assert_ne!(store.stored_entries()[0].password, stored_before[0].password);

    store.save_to_file(&path).unwrap();

    let with_new = VaultStore::load_from_file(&path, b"new-password").unwrap();
    assert_eq!(with_new.get_entries().unwrap(), entries_before);

    let with_old = VaultStore::load_from_file(&path, b"old-password").unwrap();
    assert!(matches!(
        with_old.verify(),
        Err(VaultError::DecryptionFailed)
    ));
}

#[test]
fn rotation_changes_the_salt() {
    let (_dir, path) = vault_path();

    let mut store = VaultStore::new(b"old").unwrap();
    store.add_entry("a.com", "u", "p").unwrap();
    let salt_before = store.to_vault_file().salt;

    store.change_master_password(b"new").unwrap();
    store.save_to_file(&path).unwrap();

    let file = VaultFile::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_ne!(file.salt, salt_before);
}

#[test]
fn rotation_of_empty_vault_succeeds() {
    let mut store = VaultStore::new(b"old").unwrap();
    store.change_master_password(b"new").unwrap();
    assert_eq!(store.entry_count(), 0);
}

#[test]
fn rotation_with_wrong_key_leaves_vault_untouched() {
    let (_dir, path) = vault_path();

    let mut store = VaultStore::new(b"right").unwrap();
    store
        .add_entry("a.com", "user", "a-long-enough-password-value")
        .unwrap();
    store.save_to_file(&path).unwrap();

    let mut wrong = VaultStore::load_from_file(&path, b"wrong").unwrap();
    let before = wrong.stored_entries().to_vec();

    assert!(wrong.change_master_password(b"new").is_err());
    assert_eq!(wrong.stored_entries(), before.as_slice());
}

// ---------------------------------------------------------------------------
// Vaults written by the first release
// ---------------------------------------------------------------------------

/// Build a version-1 document: one shared IV, no `version` or
/// `iterations` fields, plaintext note content.
fn legacy_document(password: &[u8]) -> String {
    let salt = generate_salt();
    let iv = generate_iv();
    let key = securevault::crypto::derive_key(password, &salt).unwrap();

    let username = encrypt(key.as_bytes(), &iv, "alice").unwrap();
    let secret = encrypt(key.as_bytes(), &iv, "pw1").unwrap();

    serde_json::json!({
        "salt": BASE64.encode(salt),
        "iv": BASE64.encode(iv),
        "entries": [
            { "website": "gmail.com", "username": username, "password": secret }
        ],
        "notes": [
            { "title": "wifi", "content": "pass: 1234" }
        ]
    })
    .to_string()
}

#[test]
fn legacy_vault_loads() {
    let (_dir, path) = vault_path();
    fs::write(&path, legacy_document(b"hunter2")).unwrap();

    let store = VaultStore::load_from_file(&path, b"hunter2").unwrap();
    assert!(store.uses_shared_iv());
    assert_eq!(
        store.get_entries().unwrap(),
        vec![CredentialEntry::new("gmail.com", "alice", "pw1")]
    );
    assert_eq!(
        store.get_notes().unwrap(),
        vec![Note::new("wifi", "pass: 1234")]
    );
}

#[test]
fn legacy_vault_is_saved_as_current_version() {
    let (_dir, path) = vault_path();
    fs::write(&path, legacy_document(b"hunter2")).unwrap();

    let store = VaultStore::load_from_file(&path, b"hunter2").unwrap();
    store.save_to_file(&path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["version"], 2);
    // Still a shared-IV vault until the password is rotated.
    assert!(json["iv"].is_string());
    assert_ne!(json["notes"][0]["content"], "pass: 1234");

    let reopened = VaultStore::load_from_file(&path, b"hunter2").unwrap();
    assert_eq!(reopened.find_note("wifi").unwrap().unwrap().content, "pass: 1234");
}

#[test]
fn rotation_upgrades_legacy_vault_to_per_field_ivs() {
    let (_dir, path) = vault_path();
    fs::write(&path, legacy_document(b"hunter2")).unwrap();

    let mut store = VaultStore::load_from_file(&path, b"hunter2").unwrap();
    store.change_master_password(b"correct horse").unwrap();
    assert!(!store.uses_shared_iv());
    store.save_to_file(&path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(json.get("iv").is_none());

    let reopened = VaultStore::load_from_file(&path, b"correct horse").unwrap();
    assert_eq!(
        reopened.get_entries().unwrap(),
        vec![CredentialEntry::new("gmail.com", "alice", "pw1")]
    );
}

/// A version-1 document with fixed material: password `hunter2`, salt
/// bytes 0x00..=0x0f, shared IV bytes 0x10..=0x1f.  The ciphertexts were
/// produced outside this crate (Python `hashlib` + `cryptography`).
const REFERENCE_V1_VAULT: &str = r#"{
    "salt": "AAECAwQFBgcICQoLDA0ODw==",
    "iv": "EBESExQVFhcYGRobHB0eHw==",
    "entries": [
        { "website": "gmail.com", "username": "/Y3pRqG+osKv2eg009m3UA==",
          "password": "aaZKypjwHNZ206uR9m3rsA==" },
        { "website": "github.com", "username": "/Y3pRqG+osKv2eg009m3UA==",
          "password": "+O/6bJNQ9L9kaqN/vlrhdg==" }
    ],
    "notes": [ { "title": "wifi", "content": "pass: 1234" } ]
}"#;

#[test]
fn reference_v1_vault_opens() {
    let (_dir, path) = vault_path();
    fs::write(&path, REFERENCE_V1_VAULT).unwrap();

    let store = VaultStore::load_from_file(&path, b"hunter2").unwrap();
    assert!(store.verify().is_ok());
    assert_eq!(
        store.get_entries().unwrap(),
        vec![
            CredentialEntry::new("gmail.com", "alice", "pw1"),
            CredentialEntry::new("github.com", "alice", "pw2"),
        ]
    );
    assert_eq!(
        store.get_notes().unwrap(),
        vec![Note::new("wifi", "pass: 1234")]
    );

    let wrong = VaultStore::load_from_file(&path, b"wrong").unwrap();
    assert!(matches!(wrong.verify(), Err(VaultError::DecryptionFailed)));
}

#[test]
fn legacy_notes_only_vault_cannot_check_password() {
    let (_dir, path) = vault_path();
    let doc = serde_json::json!({
        "salt": "AAECAwQFBgcICQoLDA0ODw==",
        "iv": "EBESExQVFhcYGRobHB0eHw==",
        "entries": [],
        "notes": [ { "title": "wifi", "content": "pass: 1234" } ]
    });
    fs::write(&path, doc.to_string()).unwrap();

    // Nothing on disk was encrypted, so any password opens it.
    let store = VaultStore::load_from_file(&path, b"anything").unwrap();
    assert!(store.verify().is_ok());
    store.save_to_file(&path).unwrap();

    // Saving re-keys the notes to the password that was supplied.
    let reopened = VaultStore::load_from_file(&path, b"anything").unwrap();
    assert_eq!(
        reopened.find_note("wifi").unwrap().unwrap().content,
        "pass: 1234"
    );
    let original = VaultStore::load_from_file(&path, b"hunter2").unwrap();
    assert!(matches!(
        original.get_notes(),
        Err(VaultError::DecryptionFailed)
    ));
}
