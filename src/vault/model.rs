//! Records held by a vault.
//!
//! `CredentialEntry` and `Note` are the plaintext views handed to
//! callers.  `StoredEntry` and `StoredNote` are the at-rest records kept
//! inside `VaultStore` and written to disk: the lookup keys (site,
//! title) stay plaintext, every other field is ciphertext.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A decrypted website credential.
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub struct CredentialEntry {
    pub site: String,
    pub username: String,
    pub password: String,
}

impl CredentialEntry {
    pub fn new(
        site: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            site: site.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("site", &self.site)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A decrypted free-text note.
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub struct Note {
    pub title: String,
    pub content: String,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// An entry as stored: `username` and `password` hold base64 ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Plaintext lookup key.  Named `website` on disk.
    #[serde(rename = "website")]
    pub site: String,
    pub username: String,
    pub password: String,
}

/// A note as stored.  `content` is ciphertext in version 2 files and
/// plaintext in legacy version 1 files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredNote {
    pub title: String,
    pub content: String,
}
