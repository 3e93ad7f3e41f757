//! Terminal output for propsync commands
//!
//! Errors go to stderr so `apply --json` keeps stdout parseable.

use colored::{ColoredString, Colorize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy)]
enum Mark {
    Info,
    Ok,
    Warn,
    Fail,
}

impl Mark {
    fn symbol(self) -> ColoredString {
        match self {
            Self::Info => "ℹ".blue(),
            Self::Ok => "✓".green(),
            Self::Warn => "⚠".yellow(),
            Self::Fail => "✗".red(),
        }
    }
}

fn line(mark: Mark, msg: impl Display) -> String {
    format!("{} {msg}", mark.symbol())
}

/// Underline as wide as the title is long, in characters
fn rule(title: &str) -> String {
    "─".repeat(title.chars().count())
}

pub fn info(msg: impl Display) {
    println!("{}", line(Mark::Info, msg));
}

pub fn success(msg: impl Display) {
    println!("{}", line(Mark::Ok, msg));
}

pub fn warn(msg: impl Display) {
    println!("{}", line(Mark::Warn, msg));
}

pub fn error(msg: impl Display) {
    eprintln!("{}", line(Mark::Fail, msg));
}

/// Secondary detail, indented and muted
pub fn dim(msg: impl Display) {
    println!("  {}", msg.to_string().dimmed());
}

pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", rule(title).dimmed());
}

/// One resource and whether its directory entry exists
pub fn resource_state(resource: &str, exists: bool) {
    let state = if exists {
        "exists".green()
    } else {
        "missing".yellow()
    };
    println!("  {}: {state}", resource.bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_prefixes_symbol() {
        colored::control::set_override(false);
        assert_eq!(line(Mark::Ok, "user[bob] applied"), "✓ user[bob] applied");
        assert_eq!(line(Mark::Fail, 3), "✗ 3");
    }

    #[test]
    fn test_rule_counts_characters() {
        assert_eq!(rule("Providers").chars().count(), 9);
        assert_eq!(rule("Státus").chars().count(), 6);
        assert!(rule("").is_empty());
    }
}
