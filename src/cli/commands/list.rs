//! `securevault list`: display all entries in a table.

use zeroize::Zeroize;

use crate::cli::output;
use crate::cli::{load_settings, unlock_vault, vault_path, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, show: bool) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let store = unlock_vault(&path)?;

    let mut entries = store.get_entries()?;

    output::info(&format!("{} entr(ies)", entries.len()));
    output::print_entries_table(&entries, show);

    entries.zeroize();
    Ok(())
}
