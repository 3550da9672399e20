//! `securevault import`: import a Bitwarden JSON export.
//!
//! Login items become entries and secure notes become notes.  Records
//! whose site or title already exists are skipped unless `--replace`
//! is given.

use std::path::Path;

use zeroize::Zeroize;

use crate::cli::output;
use crate::cli::{load_settings, unlock_vault, validate_note_content, vault_path, Cli};
use crate::errors::{Result, VaultError};
use crate::interchange::bitwarden;

/// Execute the `import` command.
pub fn execute(cli: &Cli, file_path: &str, replace: bool) -> Result<()> {
    let source = Path::new(file_path);
    if !source.exists() {
        return Err(VaultError::CommandFailed(format!(
            "import file not found: {}",
            source.display()
        )));
    }

    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let mut store = unlock_vault(&path)?;

    let mut imported = bitwarden::read_export(source)?;
    if imported.entries.is_empty() && imported.notes.is_empty() {
        output::warning("No logins or notes found in the import file.");
        return Ok(());
    }

    let mut added = 0;
    let mut skipped = 0;

    for entry in &imported.entries {
        if entry.site.trim().is_empty() {
            skipped += 1;
            continue;
        }
        if store.contains_site(&entry.site) {
            if !replace {
                output::warning(&format!("  skipped {} (already exists)", entry.site));
                skipped += 1;
                continue;
            }
            store.remove_entry_by_site(&entry.site);
        }
        store.add_entry(&entry.site, &entry.username, &entry.password)?;
        output::info(&format!("  + {}", entry.site));
        added += 1;
    }

    for note in &imported.notes {
        if note.title.trim().is_empty()
            || validate_note_content(&note.content, settings.note_max_chars).is_err()
        {
            output::warning(&format!(
                "  skipped note '{}' (empty title or too long)",
                note.title
            ));
            skipped += 1;
            continue;
        }
        if store.contains_title(&note.title) {
            if !replace {
                output::warning(&format!("  skipped note '{}' (already exists)", note.title));
                skipped += 1;
                continue;
            }
            store.remove_note_by_title(&note.title);
        }
        store.add_note(&note.title, &note.content)?;
        output::info(&format!("  + note '{}'", note.title));
        added += 1;
    }

    imported.entries.zeroize();
    imported.notes.zeroize();

    store.save_to_file(&path)?;

    output::success(&format!(
        "Imported {added} record(s) from {} ({skipped} skipped)",
        source.display()
    ));

    Ok(())
}
