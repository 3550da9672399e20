//! `securevault add`: add a credential entry.

use std::io::{self, IsTerminal};

use crate::cli::output;
use crate::cli::{
    load_settings, read_secret, read_text, unlock_vault, validate_key, vault_path, Cli,
};
use crate::errors::{Result, VaultError};

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    site: &str,
    username: Option<&str>,
    password: Option<&str>,
    replace: bool,
) -> Result<()> {
    validate_key("site", site)?;

    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let mut store = unlock_vault(&path)?;

    // The store keeps duplicates; the CLI does not.
    let existed = store.contains_site(site);
    if existed && !replace {
        return Err(VaultError::EntryAlreadyExists(site.to_string()));
    }

    // With piped stdin there is no one to ask; stdin carries the password.
    let username = match username {
        Some(u) => u.to_string(),
        None if io::stdin().is_terminal() => read_text("Username", None, None)?,
        None => {
            output::warning("No --username given; storing an empty username.");
            String::new()
        }
    };
    let secret = read_secret(&format!("Password for {site}"), password)?;

    if existed {
        store.remove_entry_by_site(site);
    }
    store.add_entry(site, &username, &secret)?;
    store.save_to_file(&path)?;

    let verb = if existed { "replaced" } else { "added" };
    output::success(&format!(
        "Entry for '{site}' {verb} ({} total)",
        store.entry_count()
    ));

    Ok(())
}
