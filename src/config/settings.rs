use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::{DEFAULT_ITERATIONS, MAX_ITERATIONS, MIN_ITERATIONS};
use crate::errors::{Result, VaultError};

/// Project-level configuration, loaded from `.securevault.toml`.
///
/// Every field has a sensible default so SecureVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file (relative to the project directory unless absolute).
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// PBKDF2 iteration count for new vaults and password changes.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Longest note content the CLI accepts, in characters.
    #[serde(default = "default_note_max_chars")]
    pub note_max_chars: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_file() -> String {
    "securevault.json".to_string()
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_note_max_chars() -> usize {
    360
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_file: default_vault_file(),
            kdf_iterations: default_kdf_iterations(),
            note_max_chars: default_note_max_chars(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".securevault.toml";

    /// Load settings from `<project_dir>/.securevault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, or asks for a PBKDF2
    /// iteration count outside the accepted range, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if !(MIN_ITERATIONS..=MAX_ITERATIONS).contains(&settings.kdf_iterations) {
            return Err(VaultError::ConfigError(format!(
                "kdf_iterations must be between {MIN_ITERATIONS} and {MAX_ITERATIONS} (got {})",
                settings.kdf_iterations
            )));
        }

        Ok(settings)
    }

    /// Resolve the vault file path against the project directory.
    ///
    /// Example: `project_dir/securevault.json`
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_file)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
