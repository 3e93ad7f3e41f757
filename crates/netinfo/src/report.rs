//! Parser for `nireport` output.
//!
//! `nireport` prints one record per line: the record name, whitespace,
//! then the selected property value. The grammar is strict: a line that
//! does not match `^(\w+)\s+(.+)$` is a hard parse error, never skipped.

use declarative::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s+(.+)$").expect("valid report line regex"));

static RECORD_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+$").expect("valid record name regex"));

/// Check that `name` can appear as the leading token of a report line.
///
/// Names outside this grammar could never be read back, and would not
/// survive being placed in a command line unquoted.
pub fn is_record_name(name: &str) -> bool {
    RECORD_NAME_REGEX.is_match(name)
}

/// One parsed report record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine<'a> {
    pub name: &'a str,
    /// Value with trailing whitespace stripped
    pub value: &'a str,
}

/// Parse a single report line.
///
/// `command` is only used to make the error point at its source.
pub fn parse_line<'a>(line: &'a str, command: &str) -> Result<ReportLine<'a>> {
    let malformed = || Error::MalformedOutput {
        command: command.to_string(),
        line: line.to_string(),
    };

    let caps = LINE_REGEX.captures(line).ok_or_else(malformed)?;
    match (caps.get(1), caps.get(2)) {
        (Some(name), Some(value)) => Ok(ReportLine {
            name: name.as_str(),
            value: value.as_str().trim_end(),
        }),
        _ => Err(malformed()),
    }
}

/// Find the value reported for `record` in the full output.
///
/// Every line is validated, including the ones that belong to other
/// records. Returns `None` when no line names `record`.
pub fn find_value<'a>(output: &'a str, record: &str, command: &str) -> Result<Option<&'a str>> {
    let mut found = None;
    for line in output.lines() {
        let parsed = parse_line(line, command)?;
        if found.is_none() && parsed.name == record {
            found = Some(parsed.value);
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMD: &str = "nireport / /users name uid";

    #[test]
    fn test_record_names() {
        assert!(is_record_name("bob"));
        assert!(is_record_name("_www"));
        assert!(is_record_name("staff2"));
        assert!(!is_record_name(""));
        assert!(!is_record_name("bob;id"));
        assert!(!is_record_name("bob smith"));
        assert!(!is_record_name("../etc"));
    }

    #[test]
    fn test_parse_line() {
        let line = parse_line("alice 27", CMD).unwrap();
        assert_eq!(line.name, "alice");
        assert_eq!(line.value, "27");
    }

    #[test]
    fn test_value_keeps_inner_spaces_and_strips_trailing() {
        let line = parse_line("bob\tBob Smith   ", CMD).unwrap();
        assert_eq!(line.value, "Bob Smith");
    }

    #[test]
    fn test_missing_value_is_error() {
        let err = parse_line("alice", CMD).unwrap_err();
        assert!(matches!(err, Error::MalformedOutput { .. }));
        assert!(err.is_internal());
    }

    #[test]
    fn test_leading_whitespace_is_error() {
        assert!(parse_line("  alice 27", CMD).is_err());
        assert!(parse_line("", CMD).is_err());
    }

    #[test]
    fn test_find_value() {
        let out = "root 0\nalice 27\nbob 501\n";
        assert_eq!(find_value(out, "alice", CMD).unwrap(), Some("27"));
        assert_eq!(find_value(out, "carol", CMD).unwrap(), None);
    }

    #[test]
    fn test_find_value_rejects_any_malformed_line() {
        let out = "alice 27\nbroken\n";
        assert!(find_value(out, "alice", CMD).is_err());
    }

    #[test]
    fn test_find_value_empty_output() {
        assert_eq!(find_value("", "alice", CMD).unwrap(), None);
    }
}
