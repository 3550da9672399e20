//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::VaultStore;

/// Minimum length for a new master password.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable holding the master password (CI/scripts).
pub const PASSWORD_ENV: &str = "SECUREVAULT_PASSWORD";

/// Environment variable holding the new master password for `rotate-key`.
pub const NEW_PASSWORD_ENV: &str = "SECUREVAULT_NEW_PASSWORD";

/// SecureVault CLI: password-protected credential and note store.
#[derive(Parser)]
#[command(
    name = "securevault",
    about = "Password-protected store for website credentials and notes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: `vault_file` from .securevault.toml, or securevault.json)
    #[arg(long, global = true, env = "SECUREVAULT_FILE")]
    pub vault: Option<String>,

    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new, empty vault
    Init,

    /// Add a credential entry
    Add {
        /// Website the credential belongs to
        site: String,
        /// Username (omit for interactive prompt; empty when stdin is piped)
        #[arg(short, long)]
        username: Option<String>,
        /// Password (omit for interactive prompt or piped stdin)
        #[arg(short, long)]
        password: Option<String>,
        /// Replace existing entries for this site instead of failing
        #[arg(long)]
        replace: bool,
    },

    /// Show the username and password for a site
    Get {
        /// Website to look up
        site: String,
    },

    /// List all credential entries
    List {
        /// Show passwords instead of masking them
        #[arg(long)]
        show: bool,
    },

    /// Edit a credential entry
    Edit {
        /// Website of the entry to edit
        site: String,
        /// Rename the entry to a new site
        #[arg(long = "site", value_name = "NEW_SITE")]
        new_site: Option<String>,
        /// New username
        #[arg(short, long)]
        username: Option<String>,
        /// New password (omit to be prompted; empty input keeps the old one)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Remove all entries for a site
    Remove {
        /// Website to remove
        site: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Manage notes
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },

    /// Change the vault's master password
    RotateKey,

    /// Import entries and notes from a Bitwarden JSON export
    Import {
        /// Path to the Bitwarden export file
        file: String,
        /// Replace existing entries/notes with the same site/title
        #[arg(long)]
        replace: bool,
    },

    /// Export entries and notes as Bitwarden JSON
    Export {
        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Note subcommands.
#[derive(clap::Subcommand)]
pub enum NoteAction {
    /// Add a note
    Add {
        /// Note title
        title: String,
        /// Note content (omit for interactive prompt or piped stdin)
        content: Option<String>,
        /// Replace an existing note with the same title
        #[arg(long)]
        replace: bool,
    },

    /// List all notes
    List {
        /// Show note content instead of masking it
        #[arg(long)]
        show: bool,
    },

    /// Print a single note
    Show {
        /// Note title
        title: String,
    },

    /// Edit a note
    Edit {
        /// Title of the note to edit
        title: String,
        /// Rename the note
        #[arg(long = "title", value_name = "NEW_TITLE")]
        new_title: Option<String>,
        /// New content (omit for interactive prompt)
        #[arg(long)]
        content: Option<String>,
    },

    /// Remove a note
    Remove {
        /// Note title
        title: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master password, trying in order:
/// 1. `SECUREVAULT_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation.
///
/// `env_var` is checked first for scripted usage.  Enforces a minimum
/// password length.
pub fn prompt_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(env_var) {
        if !pw.is_empty() {
            validate_new_password(&pw)?;
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;

        if let Err(e) = validate_new_password(&password) {
            output::warning(&format!("{e}. Try again."));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Reject master passwords shorter than the minimum length.
pub fn validate_new_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(VaultError::CommandFailed(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Load settings from the current directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Resolve the vault file path: `--vault` wins over the config file.
pub fn vault_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match &cli.vault {
        Some(path) => cwd.join(path),
        None => settings.vault_path(&cwd),
    })
}

/// Load the vault and check the master password.
///
/// The store cannot tell a wrong password from a right one until it
/// decrypts something, so we decrypt everything once here.
pub fn unlock_vault(path: &Path) -> Result<VaultStore> {
    if !path.exists() {
        output::tip("Run `securevault init` to create a vault.");
        return Err(VaultError::VaultNotFound(path.to_path_buf()));
    }

    let password = prompt_password()?;
    let store = VaultStore::load_from_file(path, password.as_bytes())?;
    store.verify()?;
    Ok(store)
}

/// Read a secret field from the command line, piped stdin, or a hidden
/// prompt, in that order.
pub fn read_secret(prompt: &str, inline: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(v) = inline {
        output::warning("Value provided on command line: it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(Zeroizing::new(buf.trim_end().to_string()));
    }

    let value = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(value))
}

/// Read a visible text field from the command line or an interactive
/// prompt.  `initial` pre-fills the prompt when editing.
pub fn read_text(prompt: &str, inline: Option<&str>, initial: Option<&str>) -> Result<String> {
    if let Some(v) = inline {
        return Ok(v.to_string());
    }

    let mut input = dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true);
    if let Some(text) = initial {
        input = input.with_initial_text(text);
    }
    input
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))
}

/// Ask for a yes/no confirmation.
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}

/// Validate a site or note title used as a lookup key.
pub fn validate_key(kind: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VaultError::CommandFailed(format!("{kind} cannot be empty")));
    }
    Ok(())
}

/// Enforce the note length limit of the editing surface.
pub fn validate_note_content(content: &str, max_chars: usize) -> Result<()> {
    let len = content.chars().count();
    if len > max_chars {
        return Err(VaultError::NoteTooLong { len, max: max_chars });
    }
    Ok(())
}
