//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{CredentialEntry, Note};

/// Placeholder shown instead of hidden values.
const MASK: &str = "******";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of entries (Site, Username, Password).
///
/// Passwords are masked unless `show` is set.
pub fn print_entries_table(entries: &[CredentialEntry], show: bool) {
    if entries.is_empty() {
        info("No entries in this vault yet.");
        tip("Run `securevault add <SITE>` to add your first entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Site", "Username", "Password"]);

    for e in entries {
        table.add_row(vec![
            e.site.as_str(),
            e.username.as_str(),
            if show { e.password.as_str() } else { MASK },
        ]);
    }

    println!("{table}");
}

/// Print a table of notes (Title, Content).
///
/// Content is masked unless `show` is set.
pub fn print_notes_table(notes: &[Note], show: bool) {
    if notes.is_empty() {
        info("No notes in this vault yet.");
        tip("Run `securevault note add <TITLE>` to add one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Title", "Content"]);

    for n in notes {
        table.add_row(vec![
            n.title.as_str(),
            if show { n.content.as_str() } else { MASK },
        ]);
    }

    println!("{table}");
}
