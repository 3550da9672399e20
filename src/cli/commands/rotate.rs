//! `securevault rotate-key`: change the vault master password.
//!
//! Everything is decrypted with the old key, re-encrypted under a key
//! derived from the new password and a fresh salt, and written back in
//! one atomic save.

use crate::cli::output;
use crate::cli::{
    load_settings, prompt_new_password, unlock_vault, vault_path, Cli, NEW_PASSWORD_ENV,
};
use crate::errors::Result;

/// Execute the `rotate-key` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let path = vault_path(cli, &settings)?;

    // 1. Open the vault with the current password.
    output::info("Enter your current master password.");
    let mut store = unlock_vault(&path)?;

    // 2. Prompt for the new password.
    output::info("Choose your new master password.");
    let new_password = prompt_new_password(NEW_PASSWORD_ENV)?;

    // 3. Re-encrypt under the new key.  Never lower an existing
    //    vault's iteration count.
    let iterations = settings.kdf_iterations.max(store.iterations());
    store.change_master_password_with_iterations(new_password.as_bytes(), iterations)?;

    // 4. Save atomically.
    store.save_to_file(&path)?;

    output::success(&format!(
        "Master password changed ({} entries and {} notes re-encrypted)",
        store.entry_count(),
        store.note_count()
    ));

    Ok(())
}
