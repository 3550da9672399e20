//! Bitwarden unencrypted JSON export format.
//!
//! Only the parts SecureVault can represent are modelled:
//!
//! - login items (`type == 1`) map to credential entries, with the item
//!   `name` as the site;
//! - secure notes (`type == 2`) map to notes.
//!
//! Everything else in the document is ignored on import.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Result, VaultError};
use crate::vault::{CredentialEntry, Note};

/// Bitwarden item type for logins.
const ITEM_TYPE_LOGIN: u8 = 1;

/// Bitwarden item type for secure notes.
const ITEM_TYPE_SECURE_NOTE: u8 = 2;

/// Top-level export document.
#[derive(Debug, Serialize, Deserialize)]
pub struct BitwardenExport {
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub folders: Vec<serde_json::Value>,
    #[serde(default)]
    pub items: Vec<BitwardenItem>,
}

/// One vault item.
#[derive(Debug, Serialize, Deserialize)]
pub struct BitwardenItem {
    #[serde(rename = "type")]
    pub item_type: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<BitwardenLogin>,
    #[serde(default, rename = "secureNote", skip_serializing_if = "Option::is_none")]
    pub secure_note: Option<SecureNote>,
}

/// Login payload of a type-1 item.
#[derive(Debug, Serialize, Deserialize)]
pub struct BitwardenLogin {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub uris: Vec<BitwardenUri>,
}

/// Bitwarden writes `{ "match": null, "uri": "..." }`; some tools write
/// bare strings.  Both are accepted.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BitwardenUri {
    Object {
        #[serde(default, rename = "match")]
        match_type: Option<u8>,
        #[serde(default)]
        uri: Option<String>,
    },
    Plain(String),
}

/// Payload of a type-2 item.
#[derive(Debug, Serialize, Deserialize)]
pub struct SecureNote {
    #[serde(rename = "type")]
    pub note_type: u8,
}

/// Plaintext records extracted from an export.
#[derive(Debug, Default)]
pub struct Imported {
    pub entries: Vec<CredentialEntry>,
    pub notes: Vec<Note>,
}

/// Parse a Bitwarden export document into entries and notes.
pub fn parse_export(json: &str) -> Result<Imported> {
    let export: BitwardenExport = serde_json::from_str(json)
        .map_err(|e| VaultError::InvalidImport(format!("not a Bitwarden export: {e}")))?;

    if export.encrypted {
        return Err(VaultError::InvalidImport(
            "encrypted Bitwarden exports are not supported".into(),
        ));
    }

    let mut imported = Imported::default();
    for item in export.items {
        match (item.item_type, item.login) {
            (ITEM_TYPE_LOGIN, Some(login)) => {
                imported.entries.push(CredentialEntry {
                    site: item.name.unwrap_or_default(),
                    username: login.username.unwrap_or_default(),
                    password: login.password.unwrap_or_default(),
                });
            }
            (ITEM_TYPE_SECURE_NOTE, _) => {
                imported.notes.push(Note {
                    title: item.name.unwrap_or_default(),
                    content: item.notes.unwrap_or_default(),
                });
            }
            (other, _) => debug!(item_type = other, "skipping unsupported item"),
        }
    }

    Ok(imported)
}

/// Build a Bitwarden export document from plaintext records.
pub fn build_export(entries: &[CredentialEntry], notes: &[Note]) -> BitwardenExport {
    let logins = entries.iter().map(|e| BitwardenItem {
        item_type: ITEM_TYPE_LOGIN,
        name: Some(e.site.clone()),
        notes: None,
        favorite: false,
        login: Some(BitwardenLogin {
            username: Some(e.username.clone()),
            password: Some(e.password.clone()),
            uris: vec![BitwardenUri::Object {
                match_type: None,
                uri: Some(e.site.clone()),
            }],
        }),
        secure_note: None,
    });

    let secure_notes = notes.iter().map(|n| BitwardenItem {
        item_type: ITEM_TYPE_SECURE_NOTE,
        name: Some(n.title.clone()),
        notes: Some(n.content.clone()),
        favorite: false,
        login: None,
        secure_note: Some(SecureNote { note_type: 0 }),
    });

    BitwardenExport {
        encrypted: false,
        folders: Vec::new(),
        items: logins.chain(secure_notes).collect(),
    }
}

/// Read and parse a Bitwarden export file.
pub fn read_export(path: &Path) -> Result<Imported> {
    let json = fs::read_to_string(path).map_err(|e| {
        VaultError::InvalidImport(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_export(&json)
}

/// Serialize records as a pretty-printed Bitwarden export.
pub fn export_to_string(entries: &[CredentialEntry], notes: &[Note]) -> Result<String> {
    serde_json::to_string_pretty(&build_export(entries, notes))
        .map_err(|e| VaultError::SerializationError(format!("Bitwarden export: {e}")))
}
