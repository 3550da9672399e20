//! `securevault init`: create a new, empty vault file.

use std::fs;

use crate::cli::output;
use crate::cli::{load_settings, prompt_new_password, vault_path, Cli, PASSWORD_ENV};
use crate::errors::{Result, VaultError};
use crate::vault::VaultStore;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;

    // 1. Refuse to overwrite an existing vault.
    if path.exists() {
        output::tip("Use `securevault add` to add entries to the existing vault.");
        return Err(VaultError::VaultAlreadyExists(path));
    }

    // 2. Create the parent directory if needed.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            output::info(&format!("Created directory: {}", parent.display()));
        }
    }

    // 3. Prompt for a new password (with confirmation).
    let password = prompt_new_password(PASSWORD_ENV)?;

    // 4. Derive the key and write the empty vault.
    let store = VaultStore::new_with_iterations(password.as_bytes(), settings.kdf_iterations)?;
    store.save_to_file(&path)?;

    output::success(&format!("Vault created at {}", path.display()));
    output::tip("Run `securevault add <SITE>` to add an entry.");
    output::tip("Run `securevault note add <TITLE>` to add a note.");

    Ok(())
}
