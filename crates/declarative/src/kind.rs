//! Property kinds - per-type validation, normalization and formatting
//!
//! Every property has a kind. Kinds are optional capabilities: each hook
//! has a default (accept everything, keep the value, print it raw), so a
//! kind only overrides what it cares about. Kinds are resolved once, by
//! property name, when a property is registered.

use crate::error::{Error, Result};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Optional hooks applied to a property's values
pub trait PropertyKind: Send + Sync + fmt::Debug {
    /// Short name of this kind, used in diagnostics
    fn name(&self) -> &'static str;

    /// Reject a proposed desired value with a reason
    fn validate(&self, _value: &Value) -> std::result::Result<(), String> {
        Ok(())
    }

    /// Normalize an already validated desired value
    fn munge(&self, value: Value) -> Value {
        value
    }

    /// Render an observed value for display
    fn format_is(&self, value: &Value) -> Result<String> {
        Ok(value.to_string())
    }

    /// Render a desired value for display
    fn format_should(&self, value: &Value) -> Result<String> {
        Ok(value.to_string())
    }
}

/// Free-form value
///
/// Numeric text is munged the way observed values are parsed, so a
/// desired "1999" matches a reported 1999.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl PropertyKind for Plain {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn munge(&self, value: Value) -> Value {
        match value {
            Value::Text(s) => Value::from_observed(&s),
            other => other,
        }
    }
}

/// Integer-valued property (uid, gid)
///
/// Accepts integers or numeric text; numeric text is munged to an integer
/// so it compares equal to what the backend reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integer;

impl PropertyKind for Integer {
    fn name(&self) -> &'static str {
        "integer"
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match value {
            Value::Int(_) => Ok(()),
            Value::Text(s) if s.trim().parse::<i64>().is_ok() => Ok(()),
            Value::Text(_) => Err("expected an integer".to_string()),
            Value::Absent => Ok(()),
        }
    }

    fn munge(&self, value: Value) -> Value {
        match value {
            Value::Text(s) => match s.trim().parse::<i64>() {
                Ok(n) => Value::Int(n),
                Err(_) => Value::Text(s),
            },
            other => other,
        }
    }
}

/// Text property that must hold an absolute path (home, shell)
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsolutePath;

impl PropertyKind for AbsolutePath {
    fn name(&self) -> &'static str {
        "absolute_path"
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match value {
            Value::Text(s) if s.starts_with('/') => Ok(()),
            Value::Text(_) => Err("expected an absolute path".to_string()),
            Value::Int(_) => Err("expected a path, got a number".to_string()),
            Value::Absent => Ok(()),
        }
    }
}

/// Numeric permission mode, displayed in octal
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMode;

impl FileMode {
    const MAX: i64 = 0o7777;

    /// Up to four octal digits, no sign
    fn parse(text: &str) -> Option<i64> {
        if text.is_empty() || text.len() > 4 || !text.bytes().all(|b| matches!(b, b'0'..=b'7')) {
            return None;
        }
        i64::from_str_radix(text, 8).ok()
    }

    /// The property name is left empty; [`Property`](crate::Property)
    /// fills it in when it formats through this kind.
    fn render(&self, value: &Value) -> Result<String> {
        match value {
            Value::Int(n) => Ok(format!("{n:04o}")),
            Value::Absent => Ok(value.to_string()),
            Value::Text(s) => Err(Error::InvalidValue {
                property: String::new(),
                value: s.clone(),
                reason: "mode was not normalized to a number".to_string(),
            }),
        }
    }
}

impl PropertyKind for FileMode {
    fn name(&self) -> &'static str {
        "file_mode"
    }

    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match value {
            Value::Int(n) if (0..=Self::MAX).contains(n) => Ok(()),
            Value::Int(n) => Err(format!("mode {n} is out of range")),
            Value::Text(s) => Self::parse(s)
                .map(|_| ())
                .ok_or_else(|| "expected an octal mode like 0755".to_string()),
            Value::Absent => Ok(()),
        }
    }

    fn munge(&self, value: Value) -> Value {
        match value {
            Value::Text(s) => Self::parse(&s).map_or(Value::Text(s), Value::Int),
            other => other,
        }
    }

    fn format_is(&self, value: &Value) -> Result<String> {
        self.render(value)
    }

    fn format_should(&self, value: &Value) -> Result<String> {
        self.render(value)
    }
}

/// Table from property name to its kind
///
/// Names without an entry resolve to [`Plain`].
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: HashMap<String, Arc<dyn PropertyKind>>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind for a property name
    pub fn with(mut self, property: &str, kind: impl PropertyKind + 'static) -> Self {
        self.kinds.insert(property.to_string(), Arc::new(kind));
        self
    }

    /// Resolve the kind for a property name
    pub fn resolve(&self, property: &str) -> Arc<dyn PropertyKind> {
        self.kinds
            .get(property)
            .cloned()
            .unwrap_or_else(|| Arc::new(Plain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_defaults() {
        let kind = Plain;
        assert!(kind.validate(&Value::from("anything")).is_ok());
        assert_eq!(kind.munge(Value::from("x")), Value::from("x"));
        assert_eq!(kind.munge(Value::from("1999")), Value::Int(1999));
        assert_eq!(kind.munge(Value::from("-7")), Value::Int(-7));
        assert_eq!(kind.munge(Value::from("0755 ")), Value::from("0755 "));
        assert_eq!(kind.format_should(&Value::Int(3)).unwrap(), "3");
    }

    #[test]
    fn test_integer() {
        let kind = Integer;
        assert!(kind.validate(&Value::Int(501)).is_ok());
        assert!(kind.validate(&Value::from("501")).is_ok());
        assert!(kind.validate(&Value::from("staff")).is_err());
        assert_eq!(kind.munge(Value::from(" 501 ")), Value::Int(501));
    }

    #[test]
    fn test_absolute_path() {
        let kind = AbsolutePath;
        assert!(kind.validate(&Value::from("/bin/zsh")).is_ok());
        assert!(kind.validate(&Value::from("zsh")).is_err());
        assert!(kind.validate(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_file_mode() {
        let kind = FileMode;
        assert!(kind.validate(&Value::from("0755")).is_ok());
        assert!(kind.validate(&Value::from("0999")).is_err());
        assert!(kind.validate(&Value::Int(0o10000)).is_err());
        assert_eq!(kind.munge(Value::from("755")), Value::Int(0o755));
        assert_eq!(kind.format_should(&Value::Int(0o644)).unwrap(), "0644");
        assert!(kind.format_is(&Value::from("rwx")).unwrap_err().is_domain());
    }

    #[test]
    fn test_file_mode_rejects_signs() {
        let kind = FileMode;
        for text in ["-1", "+7", "+777", "-0"] {
            assert!(kind.validate(&Value::from(text)).is_err(), "{text}");
            assert_eq!(kind.munge(Value::from(text)), Value::from(text));
        }
        assert!(kind.validate(&Value::from("")).is_err());
        assert!(kind.validate(&Value::from("07777")).is_err());
    }

    #[test]
    fn test_registry_falls_back_to_plain() {
        let registry = KindRegistry::new().with("uid", Integer);
        assert_eq!(registry.resolve("uid").name(), "integer");
        assert_eq!(registry.resolve("comment").name(), "plain");
    }
}
