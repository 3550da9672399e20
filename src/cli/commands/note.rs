//! `securevault note ...`: add, list, show, edit, and remove notes.
//!
//! Note content is limited to `note_max_chars` characters (360 by
//! default).  The limit belongs to this editing surface; the vault
//! itself stores content of any length.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroize;

use crate::cli::output;
use crate::cli::{
    confirm, load_settings, read_text, unlock_vault, validate_key, validate_note_content,
    vault_path, Cli,
};
use crate::errors::{Result, VaultError};

/// Execute `note add`.
pub fn execute_add(cli: &Cli, title: &str, content: Option<&str>, replace: bool) -> Result<()> {
    validate_key("title", title)?;

    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let mut store = unlock_vault(&path)?;

    let existed = store.contains_title(title);
    if existed && !replace {
        return Err(VaultError::NoteAlreadyExists(title.to_string()));
    }

    let mut content = read_content(content, None)?;
    validate_note_content(&content, settings.note_max_chars)?;

    if existed {
        store.remove_note_by_title(title);
    }
    store.add_note(title, &content)?;
    content.zeroize();
    store.save_to_file(&path)?;

    let verb = if existed { "replaced" } else { "added" };
    output::success(&format!(
        "Note '{title}' {verb} ({} total)",
        store.note_count()
    ));
    Ok(())
}

/// Execute `note list`.
pub fn execute_list(cli: &Cli, show: bool) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let store = unlock_vault(&path)?;

    let mut notes = store.get_notes()?;
    output::info(&format!("{} note(s)", notes.len()));
    output::print_notes_table(&notes, show);

    notes.zeroize();
    Ok(())
}

/// Execute `note show`.
pub fn execute_show(cli: &Cli, title: &str) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let store = unlock_vault(&path)?;

    let note = store
        .find_note(title)?
        .ok_or_else(|| VaultError::NoteNotFound(title.to_string()))?;
    println!("{}", note.content);
    Ok(())
}

/// Execute `note edit`.
pub fn execute_edit(
    cli: &Cli,
    title: &str,
    new_title: Option<&str>,
    content: Option<&str>,
) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let mut store = unlock_vault(&path)?;

    let mut current = store
        .find_note(title)?
        .ok_or_else(|| VaultError::NoteNotFound(title.to_string()))?;

    let target_title = new_title.unwrap_or(title);
    validate_key("title", target_title)?;
    if target_title != title && store.contains_title(target_title) {
        return Err(VaultError::NoteAlreadyExists(target_title.to_string()));
    }

    let mut new_content = match content {
        Some(c) => c.to_string(),
        // Only the title changes when there is no one to ask.
        None if !io::stdin().is_terminal() && new_title.is_some() => current.content.clone(),
        None => read_content(None, Some(&current.content))?,
    };
    current.zeroize();
    validate_note_content(&new_content, settings.note_max_chars)?;

    let edited = store.edit_note(title, target_title, &new_content)?;
    new_content.zeroize();
    if !edited {
        return Err(VaultError::NoteNotFound(title.to_string()));
    }

    store.save_to_file(&path)?;
    output::success(&format!("Note '{target_title}' updated"));
    Ok(())
}

/// Execute `note remove`.
pub fn execute_remove(cli: &Cli, title: &str, force: bool) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;
    let mut store = unlock_vault(&path)?;

    if !store.contains_title(title) {
        return Err(VaultError::NoteNotFound(title.to_string()));
    }

    if !force && !confirm(&format!("Remove note '{title}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    store.remove_note_by_title(title);
    store.save_to_file(&path)?;

    output::success(&format!("Removed note '{title}'"));
    Ok(())
}

/// Note content from the argument, piped stdin, or a prompt.
fn read_content(inline: Option<&str>, initial: Option<&str>) -> Result<String> {
    if inline.is_none() && !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf.trim_end().to_string());
    }
    read_text("Content", inline, initial)
}
