//! `securevault get`: print the credential stored for a site.

use crate::cli::{load_settings, unlock_vault, vault_path, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `get` command.
pub fn execute(cli: &Cli, site: &str) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let store = unlock_vault(&path)?;

    let entry = store
        .find_entry(site)?
        .ok_or_else(|| VaultError::EntryNotFound(site.to_string()))?;

    println!("username: {}", entry.username);
    println!("password: {}", entry.password);

    Ok(())
}
