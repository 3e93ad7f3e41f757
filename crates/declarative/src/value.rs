//! Scalar values held by properties
//!
//! A property observes and desires scalar values. `Absent` is the
//! not-found sentinel: the backend has no value for the attribute. It is
//! distinct from "never checked", which is modelled as `Option::None`
//! on the property itself.

use std::fmt;

/// A single observed or desired value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Purely numeric value
    Int(i64),
    /// Free-form text
    Text(String),
    /// Value is absent on the target
    Absent,
}

impl Value {
    /// Parse a value read back from a backend.
    ///
    /// Text that is purely numeric (with an optional leading sign) becomes
    /// an integer; anything else is kept as text.
    pub fn from_observed(raw: &str) -> Self {
        if is_integer_literal(raw) {
            if let Ok(n) = raw.parse::<i64>() {
                return Value::Int(n);
            }
        }
        Value::Text(raw.to_string())
    }

    /// Check if this is the not-found sentinel
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Get the integer payload, if any
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the text payload, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

fn is_integer_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Absent => write!(f, "absent"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Desired-value input: a single value or an ordered list of them.
///
/// Assignment always coerces to a list.
#[derive(Debug, Clone, PartialEq)]
pub enum Desired {
    One(Value),
    Many(Vec<Value>),
}

impl Desired {
    /// Coerce into the ordered list form
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Desired::One(v) => vec![v],
            Desired::Many(vs) => vs,
        }
    }
}

impl From<Value> for Desired {
    fn from(v: Value) -> Self {
        Desired::One(v)
    }
}

impl From<Vec<Value>> for Desired {
    fn from(vs: Vec<Value>) -> Self {
        Desired::Many(vs)
    }
}

impl From<i64> for Desired {
    fn from(n: i64) -> Self {
        Desired::One(Value::Int(n))
    }
}

impl From<&str> for Desired {
    fn from(s: &str) -> Self {
        Desired::One(Value::from(s))
    }
}

impl From<String> for Desired {
    fn from(s: String) -> Self {
        Desired::One(Value::Text(s))
    }
}

impl From<Vec<&str>> for Desired {
    fn from(vs: Vec<&str>) -> Self {
        Desired::Many(vs.into_iter().map(Value::from).collect())
    }
}
