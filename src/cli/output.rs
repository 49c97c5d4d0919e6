//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print plain output (no color, for data such as JSON or markdown)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print one token line: position and kind dimmed, content plain
pub fn token(line: usize, kind: &str, tag: &str, content: &str) {
    println!(
        "{:>4} {:<15} {:<6} {}",
        line.to_string().dimmed(),
        kind.blue(),
        tag,
        content
    );
}

/// Print a path with an existence marker
pub fn path_status(label: &str, path: &std::path::Path, exists: bool) {
    let marker = if exists { "✓".green() } else { "✗".red() };
    println!("{} {}: {}", marker, label.cyan(), path.display());
}
