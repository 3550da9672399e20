//! JSON vault file format.
//!
//! A vault file looks like this:
//!
//! ```text
//! {
//!   "version": 2,
//!   "salt": "<base64, 16 bytes>",
//!   "iv": "<base64, 16 bytes>",          (shared-IV vaults only)
//!   "iterations": 65536,
//!   "entries": [ { "website": "...", "username": "<b64>", "password": "<b64>" } ],
//!   "notes":   [ { "title": "...", "content": "..." } ]
//! }
//! ```
//!
//! - **version**: absent in files written by the first release, which
//!   we read as version `1`.  Version 1 files always carry `iv` and keep
//!   note content in plaintext.
//! - **iv**: when present, every field was encrypted with this one IV.
//!   When absent, each field carries its own IV (see `crypto::seal`).
//! - **iterations**: PBKDF2 iteration count; absent means the default.
//!
//! Unknown top-level fields are ignored and a missing `notes` array is
//! read as empty.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::{StoredEntry, StoredNote};
use crate::crypto::{DEFAULT_ITERATIONS, IV_LEN, MAX_ITERATIONS, MIN_ITERATIONS};
use crate::errors::{Result, VaultError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Version assumed when the `version` field is missing.
pub const LEGACY_VERSION: u32 = 1;

/// Version written by this release.
pub const CURRENT_VERSION: u32 = 2;

// ---------------------------------------------------------------------------
// VaultFile
// ---------------------------------------------------------------------------

/// The complete persisted state of a vault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultFile {
    /// Format version.
    #[serde(default = "legacy_version")]
    pub version: u32,

    /// PBKDF2 salt (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    /// Shared IV, for vaults that use one IV for every field.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "base64_encode_opt",
        deserialize_with = "base64_decode_opt"
    )]
    pub iv: Option<Vec<u8>>,

    /// PBKDF2 iteration count used to derive the key.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Credential entries in insertion order.
    pub entries: Vec<StoredEntry>,

    /// Notes in insertion order.
    #[serde(default)]
    pub notes: Vec<StoredNote>,
}

fn legacy_version() -> u32 {
    LEGACY_VERSION
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

impl VaultFile {
    /// Whether note content in this file is ciphertext.
    pub fn notes_encrypted(&self) -> bool {
        self.version >= CURRENT_VERSION
    }

    /// Check the structural invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.version != LEGACY_VERSION && self.version != CURRENT_VERSION {
            return Err(VaultError::InvalidVaultFormat(format!(
                "unsupported version {}, expected {LEGACY_VERSION} or {CURRENT_VERSION}",
                self.version
            )));
        }

        if self.salt.is_empty() {
            return Err(VaultError::InvalidVaultFormat("salt is empty".into()));
        }

        if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(VaultError::InvalidVaultFormat(format!(
                "iterations must be between {MIN_ITERATIONS} and {MAX_ITERATIONS}, got {}",
                self.iterations
            )));
        }

        match &self.iv {
            Some(iv) if iv.len() != IV_LEN => {
                return Err(VaultError::InvalidVaultFormat(format!(
                    "iv must be {IV_LEN} bytes, got {}",
                    iv.len()
                )));
            }
            None if self.version == LEGACY_VERSION => {
                return Err(VaultError::InvalidVaultFormat(
                    "version 1 vault is missing its iv".into(),
                ));
            }
            _ => {}
        }

        Ok(())
    }

    /// Parse and validate a vault document.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: VaultFile = serde_json::from_str(json)
            .map_err(|e| VaultError::InvalidVaultFormat(format!("vault JSON: {e}")))?;
        file.validate()?;
        Ok(file)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::SerializationError(format!("vault: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Write a vault file to disk **atomically**.
///
/// The document goes to a temp file in the same directory which is then
/// renamed over the target path, so readers never see a half-written
/// file.  On Unix the file is owner-only (0600) from the moment it is
/// created.
pub fn write_vault(path: &Path, file: &VaultFile) -> Result<()> {
    let json = file.to_json()?;

    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    if let Err(e) = write_private(&tmp_path, json.as_bytes()) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    debug!(
        path = %path.display(),
        entries = file.entries.len(),
        notes = file.notes.len(),
        "vault written"
    );
    Ok(())
}

/// Write `contents` to `path` so that no other user can read it.
///
/// On Unix a new file is created with mode 0600 and an existing file is
/// narrowed to 0600 after truncation, before any byte is written.
pub fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(contents)?;
    file.sync_all()
}

/// Read and validate a vault file from disk.
pub fn read_vault(path: &Path) -> Result<VaultFile> {
    if !path.exists() {
        return Err(VaultError::VaultNotFound(path.to_path_buf()));
    }

    let json = fs::read_to_string(path)?;
    let file = VaultFile::from_json(&json)?;

    debug!(path = %path.display(), version = file.version, "vault read");
    Ok(file)
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&BASE64.encode(data))
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}

fn base64_encode_opt<S>(
    data: &Option<Vec<u8>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match data {
        Some(bytes) => base64_encode(bytes, serializer),
        None => serializer.serialize_none(),
    }
}

fn base64_decode_opt<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<u8>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    s.map(|s| BASE64.decode(&s).map_err(serde::de::Error::custom))
        .transpose()
}
