//! `securevault remove`: remove every entry for a site.

use crate::cli::output;
use crate::cli::{confirm, load_settings, unlock_vault, vault_path, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `remove` command.
pub fn execute(cli: &Cli, site: &str, force: bool) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let mut store = unlock_vault(&path)?;

    if !store.contains_site(site) {
        return Err(VaultError::EntryNotFound(site.to_string()));
    }

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !confirm(&format!("Remove entry for '{site}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    store.remove_entry_by_site(site);
    store.save_to_file(&path)?;

    output::success(&format!("Removed entry for '{site}'"));
    Ok(())
}
