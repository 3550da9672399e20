//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` is the only place that holds the master key.  Every
//! secret field goes through it: entries and note content are encrypted
//! on write and decrypted on read, so callers only ever see plaintext
//! views (`CredentialEntry`, `Note`).
//!
//! The store does not enforce uniqueness of sites or note titles.
//! `add_entry` twice with the same site keeps both; hosts that want
//! replace semantics call `remove_entry_by_site` first.

use std::path::Path;

use tracing::{debug, info, warn};
use zeroize::Zeroize;

use crate::crypto::{
    decrypt, derive_key_with_iterations, encrypt, generate_salt, seal, unseal, MasterKey,
    DEFAULT_ITERATIONS, IV_LEN,
};
use crate::errors::{Result, VaultError};

use super::format::{self, VaultFile, CURRENT_VERSION};
use super::model::{CredentialEntry, Note, StoredEntry, StoredNote};

/// How field IVs are chosen for the active key.
#[derive(Clone, Copy)]
enum IvMode {
    /// One IV for every field, persisted in the vault header.
    Shared([u8; IV_LEN]),
    /// A fresh IV per field, stored in front of its ciphertext.
    PerField,
}

/// Encrypts and decrypts single fields under one key and IV mode.
struct FieldCipher<'a> {
    key: &'a MasterKey,
    iv_mode: IvMode,
}

impl FieldCipher<'_> {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        match &self.iv_mode {
            IvMode::Shared(iv) => encrypt(self.key.as_bytes(), iv, plaintext),
            IvMode::PerField => seal(self.key.as_bytes(), plaintext),
        }
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        match &self.iv_mode {
            IvMode::Shared(iv) => decrypt(self.key.as_bytes(), iv, ciphertext),
            IvMode::PerField => unseal(self.key.as_bytes(), ciphertext),
        }
    }

    fn encrypt_entry(&self, site: &str, username: &str, password: &str) -> Result<StoredEntry> {
        Ok(StoredEntry {
            site: site.to_string(),
            username: self.encrypt(username)?,
            password: self.encrypt(password)?,
        })
    }

    fn decrypt_entry(&self, stored: &StoredEntry) -> Result<CredentialEntry> {
        Ok(CredentialEntry {
            site: stored.site.clone(),
            username: self.decrypt(&stored.username)?,
            password: self.decrypt(&stored.password)?,
        })
    }

    fn encrypt_note(&self, title: &str, content: &str) -> Result<StoredNote> {
        Ok(StoredNote {
            title: title.to_string(),
            content: self.encrypt(content)?,
        })
    }

    fn decrypt_note(&self, stored: &StoredNote) -> Result<Note> {
        Ok(Note {
            title: stored.title.clone(),
            content: self.decrypt(&stored.content)?,
        })
    }
}

/// The main vault handle.  Create one with `VaultStore::new` or
/// `VaultStore::load_from_file`, then use its methods to manage entries
/// and notes.  Dropping it is the only way to lock the vault.
pub struct VaultStore {
    /// PBKDF2 salt for the active key.
    salt: Vec<u8>,

    /// PBKDF2 iteration count for the active key.
    iterations: u32,

    iv_mode: IvMode,

    /// The derived master key (zeroized on drop).
    master_key: MasterKey,

    /// Encrypted entries in insertion order.
    entries: Vec<StoredEntry>,

    /// Encrypted notes in insertion order.
    notes: Vec<StoredNote>,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a brand-new, empty vault in memory.
    ///
    /// Generates a random salt and derives the master key from the
    /// password.  Nothing is written to disk until `save_to_file`.
    pub fn new(password: &[u8]) -> Result<Self> {
        Self::new_with_iterations(password, DEFAULT_ITERATIONS)
    }

    /// Like `new`, with an explicit PBKDF2 iteration count.
    pub fn new_with_iterations(password: &[u8], iterations: u32) -> Result<Self> {
        let salt = generate_salt();
        let master_key = derive_key_with_iterations(password, &salt, iterations)?;

        info!(iterations, "created new vault");

        Ok(Self {
            salt: salt.to_vec(),
            iterations,
            iv_mode: IvMode::PerField,
            master_key,
            entries: Vec::new(),
            notes: Vec::new(),
        })
    }

    /// Rebuild a vault from its persisted form and a candidate password.
    ///
    /// The key is derived from the stored salt, but nothing is decrypted
    /// here: a wrong password is only noticed by the first read
    /// (`get_entries`, `get_notes` or `verify`).
    pub fn load(file: VaultFile, password: &[u8]) -> Result<Self> {
        file.validate()?;

        let master_key = derive_key_with_iterations(password, &file.salt, file.iterations)?;

        let iv_mode = match &file.iv {
            Some(iv) => {
                let iv: [u8; IV_LEN] = iv.as_slice().try_into().map_err(|_| {
                    VaultError::InvalidVaultFormat(format!("iv must be {IV_LEN} bytes"))
                })?;
                IvMode::Shared(iv)
            }
            None => IvMode::PerField,
        };

        // Legacy files keep note content in plaintext.  Bring it under the
        // active key so that every held field is ciphertext.
        let notes = if file.notes_encrypted() {
            file.notes
        } else {
            if file.entries.is_empty() && !file.notes.is_empty() {
                warn!("legacy vault has no entries; the password cannot be checked");
            }
            let cipher = FieldCipher {
                key: &master_key,
                iv_mode,
            };
            file.notes
                .iter()
                .map(|n| cipher.encrypt_note(&n.title, &n.content))
                .collect::<Result<Vec<_>>>()?
        };

        info!(
            version = file.version,
            entries = file.entries.len(),
            notes = notes.len(),
            shared_iv = matches!(iv_mode, IvMode::Shared(_)),
            "vault loaded"
        );

        Ok(Self {
            salt: file.salt,
            iterations: file.iterations,
            iv_mode,
            master_key,
            entries: file.entries,
            notes,
        })
    }

    /// Read a vault file from disk and load it with `password`.
    pub fn load_from_file(path: &Path, password: &[u8]) -> Result<Self> {
        let file = format::read_vault(path)?;
        Self::load(file, password)
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Encrypt and append a credential entry.
    ///
    /// Does not check whether `site` is already present.
    pub fn add_entry(&mut self, site: &str, username: &str, password: &str) -> Result<()> {
        let stored = self.cipher().encrypt_entry(site, username, password)?;
        self.entries.push(stored);
        debug!(site, total = self.entries.len(), "entry added");
        Ok(())
    }

    /// Decrypt every entry, in insertion order.
    ///
    /// Any field that fails to decrypt aborts the call with
    /// `DecryptionFailed`; this is how a wrong password surfaces.
    pub fn get_entries(&self) -> Result<Vec<CredentialEntry>> {
        let cipher = self.cipher();
        self.entries
            .iter()
            .map(|e| cipher.decrypt_entry(e))
            .collect()
    }

    /// Decrypt the first entry whose site equals `site`.
    pub fn find_entry(&self, site: &str) -> Result<Option<CredentialEntry>> {
        self.entries
            .iter()
            .find(|e| e.site == site)
            .map(|e| self.cipher().decrypt_entry(e))
            .transpose()
    }

    /// Replace the first entry matching `old_site` in place.
    ///
    /// Both fields are re-encrypted even when only the site changes.
    /// Returns `false`, leaving the vault untouched, when no entry
    /// matches.
    pub fn edit_entry(
        &mut self,
        old_site: &str,
        new_site: &str,
        new_username: &str,
        new_password: &str,
    ) -> Result<bool> {
        let Some(index) = self.entries.iter().position(|e| e.site == old_site) else {
            return Ok(false);
        };

        let stored = self
            .cipher()
            .encrypt_entry(new_site, new_username, new_password)?;
        self.entries[index] = stored;
        debug!(old_site, new_site, "entry edited");
        Ok(true)
    }

    /// Remove every entry whose site equals `site`.
    ///
    /// Returns whether anything was removed.
    pub fn remove_entry_by_site(&mut self, site: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.site != site);
        let removed = before - self.entries.len();
        debug!(site, removed, "entries removed");
        removed > 0
    }

    /// Returns `true` if an entry with this site exists (no decryption).
    pub fn contains_site(&self, site: &str) -> bool {
        self.entries.iter().any(|e| e.site == site)
    }

    /// Returns the number of stored entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    // ------------------------------------------------------------------
    // Note operations
    // ------------------------------------------------------------------

    /// Encrypt and append a note.  Does not check title uniqueness.
    pub fn add_note(&mut self, title: &str, content: &str) -> Result<()> {
        let stored = self.cipher().encrypt_note(title, content)?;
        self.notes.push(stored);
        debug!(title, total = self.notes.len(), "note added");
        Ok(())
    }

    /// Decrypt every note, in insertion order.
    pub fn get_notes(&self) -> Result<Vec<Note>> {
        let cipher = self.cipher();
        self.notes.iter().map(|n| cipher.decrypt_note(n)).collect()
    }

    /// Decrypt the first note whose title equals `title`.
    pub fn find_note(&self, title: &str) -> Result<Option<Note>> {
        self.notes
            .iter()
            .find(|n| n.title == title)
            .map(|n| self.cipher().decrypt_note(n))
            .transpose()
    }

    /// Replace the first note matching `old_title` in place.
    pub fn edit_note(
        &mut self,
        old_title: &str,
        new_title: &str,
        new_content: &str,
    ) -> Result<bool> {
        let Some(index) = self.notes.iter().position(|n| n.title == old_title) else {
            return Ok(false);
        };

        let stored = self.cipher().encrypt_note(new_title, new_content)?;
        self.notes[index] = stored;
        debug!(old_title, new_title, "note edited");
        Ok(true)
    }

    /// Remove every note whose title equals `title`.
    pub fn remove_note_by_title(&mut self, title: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.title != title);
        let removed = before - self.notes.len();
        debug!(title, removed, "notes removed");
        removed > 0
    }

    /// Returns `true` if a note with this title exists (no decryption).
    pub fn contains_title(&self, title: &str) -> bool {
        self.notes.iter().any(|n| n.title == title)
    }

    /// Returns the number of stored notes.
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    // ------------------------------------------------------------------
    // Password checks and rotation
    // ------------------------------------------------------------------

    /// Decrypt every stored field and discard the result.
    ///
    /// Hosts call this right after loading to reject a wrong password.
    /// Only ciphertext read from the file can reveal a wrong password, so
    /// any password is accepted when the file holds none: a vault with no
    /// entries and no notes, or a version 1 vault with no entries (its
    /// notes were plaintext and get encrypted under whatever key `load`
    /// derived).  Saving such a vault re-keys it to that password.
    pub fn verify(&self) -> Result<()> {
        let mut entries = self.get_entries()?;
        entries.zeroize();
        let mut notes = self.get_notes()?;
        notes.zeroize();
        Ok(())
    }

    /// Change the master password, keeping the current iteration count.
    pub fn change_master_password(&mut self, new_password: &[u8]) -> Result<()> {
        self.change_master_password_with_iterations(new_password, self.iterations)
    }

    /// Change the master password and the PBKDF2 iteration count.
    ///
    /// Decrypts everything under the current key, derives a new key from
    /// a fresh salt, re-encrypts every field with per-field IVs, then
    /// swaps the new state in.  If any step fails the vault keeps its
    /// previous key and contents.
    pub fn change_master_password_with_iterations(
        &mut self,
        new_password: &[u8],
        iterations: u32,
    ) -> Result<()> {
        // 1. Decrypt everything with the current key.
        let mut entries = self.get_entries()?;
        let mut notes = match self.get_notes() {
            Ok(notes) => notes,
            Err(e) => {
                entries.zeroize();
                return Err(e);
            }
        };

        // 2. Derive the new key and re-encrypt.
        let rotated = Self::reencrypt(new_password, iterations, &entries, &notes);

        // 3. Wipe the plaintext snapshot regardless of the outcome.
        entries.zeroize();
        notes.zeroize();

        // 4. Swap in the new state.
        let (salt, master_key, new_entries, new_notes) = rotated?;
        self.salt = salt;
        self.iterations = iterations;
        self.iv_mode = IvMode::PerField;
        self.master_key = master_key;
        self.entries = new_entries;
        self.notes = new_notes;

        info!(
            entries = self.entries.len(),
            notes = self.notes.len(),
            "master password changed"
        );
        Ok(())
    }

    #[allow(clippy::type_complexity)]
    fn reencrypt(
        new_password: &[u8],
        iterations: u32,
        entries: &[CredentialEntry],
        notes: &[Note],
    ) -> Result<(Vec<u8>, MasterKey, Vec<StoredEntry>, Vec<StoredNote>)> {
        let salt = generate_salt();
        let master_key = derive_key_with_iterations(new_password, &salt, iterations)?;

        let cipher = FieldCipher {
            key: &master_key,
            iv_mode: IvMode::PerField,
        };
        let new_entries = entries
            .iter()
            .map(|e| cipher.encrypt_entry(&e.site, &e.username, &e.password))
            .collect::<Result<Vec<_>>>()?;
        let new_notes = notes
            .iter()
            .map(|n| cipher.encrypt_note(&n.title, &n.content))
            .collect::<Result<Vec<_>>>()?;

        Ok((salt.to_vec(), master_key, new_entries, new_notes))
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Build the persisted form of this vault.
    pub fn to_vault_file(&self) -> VaultFile {
        VaultFile {
            version: CURRENT_VERSION,
            salt: self.salt.clone(),
            iv: match &self.iv_mode {
                IvMode::Shared(iv) => Some(iv.to_vec()),
                IvMode::PerField => None,
            },
            iterations: self.iterations,
            entries: self.entries.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Write the vault to `path` (whole-file rewrite via temp + rename).
    ///
    /// On failure the in-memory state is unchanged.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        format::write_vault(path, &self.to_vault_file())?;
        info!(path = %path.display(), "vault saved");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The stored (encrypted) entries, exactly as they will be written.
    pub fn stored_entries(&self) -> &[StoredEntry] {
        &self.entries
    }

    /// The stored (encrypted) notes, exactly as they will be written.
    pub fn stored_notes(&self) -> &[StoredNote] {
        &self.notes
    }

    /// PBKDF2 iteration count of the active key.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Whether every field shares the single IV from the vault header.
    /// Only vaults written by older releases are in this mode; rotating
    /// the password moves them to per-field IVs.
    pub fn uses_shared_iv(&self) -> bool {
        matches!(self.iv_mode, IvMode::Shared(_))
    }

    fn cipher(&self) -> FieldCipher<'_> {
        FieldCipher {
            key: &self.master_key,
            iv_mode: self.iv_mode,
        }
    }
}
