//! `securevault export`: write entries and notes as Bitwarden JSON.
//!
//! The export is plaintext.  When written to a file, the file is
//! created owner-readable only on Unix.

use zeroize::Zeroize;

use crate::cli::output;
use crate::cli::{load_settings, unlock_vault, vault_path, Cli};
use crate::errors::{Result, VaultError};
use crate::interchange::bitwarden;
use crate::vault::format;

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: Option<&str>) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let store = unlock_vault(&path)?;

    let mut entries = store.get_entries()?;
    let mut notes = store.get_notes()?;
    let content = bitwarden::export_to_string(&entries, &notes);
    let (entry_count, note_count) = (entries.len(), notes.len());
    entries.zeroize();
    notes.zeroize();
    let mut content = content?;

    match output_path {
        Some(dest) => {
            let cwd = std::env::current_dir()?;
            let dest_path = cwd.join(dest);

            // Refuse to overwrite the vault itself.
            if dest_path == path {
                content.zeroize();
                return Err(VaultError::CommandFailed(
                    "refusing to export over the vault file".into(),
                ));
            }

            let written = format::write_private(&dest_path, content.as_bytes()).map_err(|e| {
                VaultError::CommandFailed(format!("failed to write export file: {e}"))
            });
            content.zeroize();
            written?;

            output::success(&format!(
                "Exported {entry_count} entries and {note_count} notes to {dest}"
            ));
            output::warning("The export is unencrypted. Delete it once imported.");
        }
        None => {
            // Write to stdout (no success message, just raw output).
            println!("{content}");
            content.zeroize();
        }
    }

    Ok(())
}
