//! Vault module: encrypted credential and note storage.
//!
//! This module provides:
//! - Plaintext and at-rest record types (`model`)
//! - The JSON vault file format (`format`)
//! - High-level `VaultStore` for creating, opening, and managing vaults (`store`)

pub mod format;
pub mod model;
pub mod store;

// Re-export the most commonly used items.
pub use format::VaultFile;
pub use model::{CredentialEntry, Note, StoredEntry, StoredNote};
pub use store::VaultStore;
