//! Output formatting utilities.

use colored::Colorize;

use am_tree::ExportSummary;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Prints the final report of an export.
pub fn summary(summary: &ExportSummary) {
    success(&format!("Done! {} entities exported", summary.total()));
    for (entity_type, count) in &summary.by_type {
        println!("  {entity_type}: {count}");
    }
}

/// Prompts for password input (hidden).
pub fn prompt_password(prompt: &str) -> crate::CliResult<String> {
    rpassword::prompt_password(prompt).map_err(crate::CliError::Io)
}
