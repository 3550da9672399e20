//! `securevault edit`: change the site, username, or password of an entry.
//!
//! Fields not given on the command line are prompted for, pre-filled with
//! the current value.  An empty password answer keeps the old password.

use std::io::{self, IsTerminal};

use zeroize::Zeroize;

use crate::cli::output;
use crate::cli::{
    load_settings, read_secret, read_text, unlock_vault, validate_key, vault_path, Cli,
};
use crate::errors::{Result, VaultError};

/// Execute the `edit` command.
pub fn execute(
    cli: &Cli,
    site: &str,
    new_site: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let mut store = unlock_vault(&path)?;

    let mut current = store
        .find_entry(site)?
        .ok_or_else(|| VaultError::EntryNotFound(site.to_string()))?;

    // 1. Resolve the new site and refuse to collide with another entry.
    let target_site = new_site.unwrap_or(site);
    validate_key("site", target_site)?;
    if target_site != site && store.contains_site(target_site) {
        return Err(VaultError::EntryAlreadyExists(target_site.to_string()));
    }

    // 2. Resolve the username.
    let new_username = match username {
        Some(u) => u.to_string(),
        None if io::stdin().is_terminal() => {
            read_text("Username", None, Some(&current.username))?
        }
        None => current.username.clone(),
    };

    // 3. Resolve the password; empty input keeps the current one.
    let secret = read_secret("New password (leave empty to keep)", password)?;
    let new_password = if secret.is_empty() {
        current.password.as_str()
    } else {
        secret.as_str()
    };

    let edited = store.edit_entry(site, target_site, &new_username, new_password)?;
    current.zeroize();
    if !edited {
        return Err(VaultError::EntryNotFound(site.to_string()));
    }

    store.save_to_file(&path)?;
    output::success(&format!("Entry '{target_site}' updated"));

    Ok(())
}
