//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command and the shell.

use std::collections::BTreeMap;

use comfy_table::{ContentArrangement, Table};
use console::style;

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

/// Print one description per line, or a note if there are none.
pub fn print_descriptions(descriptions: &[String]) {
    if descriptions.is_empty() {
        info("Your password storage is empty.");
        return;
    }

    for description in descriptions {
        println!("{description}");
    }
}

/// Print a table of matching entries (Description, Password).
pub fn print_entries_table(entries: &BTreeMap<String, String>) {
    if entries.is_empty() {
        info("No passwords with that description.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Description", "Password"]);

    for (description, secret) in entries {
        table.add_row(vec![description.as_str(), secret.as_str()]);
    }

    println!("{table}");
}
