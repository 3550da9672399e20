use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in SecureVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Wrong master password and corrupted ciphertext look the same:
    /// there is no authentication tag to tell them apart.
    #[error("Decryption failed: incorrect password or corrupted vault")]
    DecryptionFailed,

    // --- Persistence errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Vault already exists at {0}")]
    VaultAlreadyExists(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Entry / note errors (raised by the CLI host) ---
    #[error("No entry for site '{0}'")]
    EntryNotFound(String),

    #[error("An entry for site '{0}' already exists (use --replace to overwrite)")]
    EntryAlreadyExists(String),

    #[error("Note '{0}' not found")]
    NoteNotFound(String),

    #[error("Note '{0}' already exists (use --replace to overwrite)")]
    NoteAlreadyExists(String),

    #[error("Note content is {len} characters, the limit is {max}")]
    NoteTooLong { len: usize, max: usize },

    // --- Interchange errors ---
    #[error("Invalid import file: {0}")]
    InvalidImport(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl VaultError {
    /// `true` for failures of the persistence layer: file access and
    /// document structure, as opposed to cryptographic failures.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::VaultNotFound(_)
                | Self::VaultAlreadyExists(_)
                | Self::InvalidVaultFormat(_)
                | Self::Io(_)
                | Self::SerializationError(_)
        )
    }
}

/// Convenience type alias for SecureVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
