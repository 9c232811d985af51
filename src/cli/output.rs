//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::path::Path;

use colored::Colorize;

/// Print error (red "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print plain output (no color)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print the extracted CSS for one destination during a dry run. Goes to
/// stderr: stdout carries the cleaned stylesheet and stays pipeable.
pub fn dry_run(destination: &Path, css: &str) {
    eprintln!(
        "{} {}",
        format!("Critical CSS for {}:", destination.display()).green(),
        css.yellow()
    );
}
