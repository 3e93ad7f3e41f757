//! Error types for property reconciliation.
//!
//! Errors fall into two kinds. Configuration/internal errors are fatal to
//! the current operation and are never retried here. Domain errors are
//! raised when a proposed desired value is rejected by its property kind.

use thiserror::Error;

/// Errors that can occur while managing a property.
#[derive(Debug, Error)]
pub enum Error {
    /// A property was built without an owning resource
    #[error("property '{property}' has no parent resource")]
    MissingParent {
        /// Name of the orphaned property
        property: String,
    },

    /// Two properties with the same name on one resource
    #[error("resource '{resource}' already manages property '{property}'")]
    DuplicateProperty {
        /// Name of the parent resource
        resource: String,
        /// Duplicated property name
        property: String,
    },

    /// No backend key could be resolved for a property
    #[error("provider {provider} has no backend key for property '{property}'")]
    UnresolvedKey {
        /// Provider type name
        provider: String,
        /// Property name that failed to resolve
        property: String,
    },

    /// Backend output did not follow the expected line grammar
    #[error("malformed output line from {command}: {line:?}")]
    MalformedOutput {
        /// Command whose output was being parsed
        command: String,
        /// The offending line
        line: String,
    },

    /// Logging was requested but the parent has no log level
    #[error("resource '{resource}' has no log level configured")]
    NoLogLevel {
        /// Name of the parent resource
        resource: String,
    },

    /// An external command could not be started
    #[error("failed to launch `{command}`: {source}")]
    CommandLaunch {
        /// The command line that failed to start
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A proposed desired value was rejected
    #[error("invalid value {value:?} for '{property}': {reason}")]
    InvalidValue {
        /// Property the value was proposed for
        property: String,
        /// The rejected value, as text
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Internal invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true for domain errors (a rejected desired value).
    pub fn is_domain(&self) -> bool {
        matches!(self, Error::InvalidValue { .. })
    }

    /// Returns true for configuration/internal errors.
    ///
    /// These are always fatal to the operation that raised them.
    pub fn is_internal(&self) -> bool {
        !self.is_domain()
    }

    /// Attribute a rejected value to `property`
    #[must_use]
    pub fn for_property(self, property: &str) -> Self {
        match self {
            Error::InvalidValue { value, reason, .. } => Error::InvalidValue {
                property: property.to_string(),
                value,
                reason,
            },
            other => other,
        }
    }
}

/// Result type for property operations
pub type Result<T> = std::result::Result<T, Error>;
