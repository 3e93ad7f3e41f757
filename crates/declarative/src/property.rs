//! The property object: one managed attribute of a resource
//!
//! A property holds the observed value (`is`) and the ordered list of
//! acceptable desired values (`should`). Several desired values form an
//! "any of" compliance set, but enforcement always targets the first.

use crate::context::{LogRecord, ReconcileContext};
use crate::error::{Error, Result};
use crate::kind::{Plain, PropertyKind};
use crate::matcher::matches_any;
use crate::resource::Resource;
use crate::value::{Desired, Value};
use std::fmt;
use std::sync::Arc;

/// A single declaratively managed attribute
pub struct Property {
    name: String,
    parent: Arc<Resource>,
    kind: Arc<dyn PropertyKind>,
    should: Option<Vec<Value>>,
    should_original: Option<Vec<Value>>,
    is: Option<Value>,
    noop: bool,
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("path", &self.path())
            .field("kind", &self.kind.name())
            .field("should", &self.should)
            .field("is", &self.is)
            .finish()
    }
}

/// Builder for [`Property`]
///
/// The parent is required; building without one is a configuration error.
pub struct PropertyBuilder {
    name: String,
    parent: Option<Arc<Resource>>,
    kind: Arc<dyn PropertyKind>,
    should: Option<Desired>,
    is: Option<Value>,
    noop: bool,
}

impl PropertyBuilder {
    pub fn parent(mut self, parent: Arc<Resource>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn kind(mut self, kind: Arc<dyn PropertyKind>) -> Self {
        self.kind = kind;
        self
    }

    pub fn should(mut self, should: impl Into<Desired>) -> Self {
        self.should = Some(should.into());
        self
    }

    pub fn is(mut self, is: Value) -> Self {
        self.is = Some(is);
        self
    }

    pub fn noop(mut self, noop: bool) -> Self {
        self.noop = noop;
        self
    }

    /// Build the property, validating the initial desired value if any
    pub fn build(self) -> Result<Property> {
        let parent = self.parent.ok_or_else(|| Error::MissingParent {
            property: self.name.clone(),
        })?;

        let mut property = Property {
            name: self.name,
            parent,
            kind: self.kind,
            should: None,
            should_original: None,
            is: self.is,
            noop: self.noop,
        };

        if let Some(should) = self.should {
            property.set_should(should)?;
        }

        Ok(property)
    }
}

impl Property {
    /// Start building a property with the given name
    pub fn builder(name: &str) -> PropertyBuilder {
        PropertyBuilder {
            name: name.to_string(),
            parent: None,
            kind: Arc::new(Plain),
            should: None,
            is: None,
            noop: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> &Resource {
        &self.parent
    }

    pub(crate) fn parent_handle(&self) -> &Arc<Resource> {
        &self.parent
    }

    pub fn kind(&self) -> &dyn PropertyKind {
        self.kind.as_ref()
    }

    /// Path used as the log source, e.g. "user[bob]/comment"
    pub fn path(&self) -> String {
        format!("{}/{}", self.parent, self.name)
    }

    /// Assign the desired value(s).
    ///
    /// Scalars are coerced to a one-element list. Every value is validated
    /// before anything is stored, so a rejected assignment leaves the
    /// previous desired values untouched.
    pub fn set_should(&mut self, desired: impl Into<Desired>) -> Result<()> {
        let original = desired.into().into_vec();

        for value in &original {
            self.kind
                .validate(value)
                .map_err(|reason| Error::InvalidValue {
                    property: self.name.clone(),
                    value: value.to_string(),
                    reason,
                })?;
        }

        let munged = original
            .iter()
            .cloned()
            .map(|value| self.kind.munge(value))
            .collect();

        self.should_original = Some(original);
        self.should = Some(munged);
        Ok(())
    }

    /// The canonical desired value: the first accepted one
    pub fn should(&self) -> Option<&Value> {
        self.should.as_ref().and_then(|values| values.first())
    }

    /// Every accepted desired value, after munging
    pub fn should_values(&self) -> &[Value] {
        self.should.as_deref().unwrap_or_default()
    }

    /// Desired values exactly as they were supplied
    pub fn should_original(&self) -> Option<&[Value]> {
        self.should_original.as_deref()
    }

    /// Last observed value; `None` if never checked
    pub fn is(&self) -> Option<&Value> {
        self.is.as_ref()
    }

    /// Record an observed value
    pub fn set_is(&mut self, value: Value) {
        self.is = Some(value);
    }

    /// Check whether the observed value is acceptable.
    ///
    /// An unset or empty desired list means "do not manage" and is always
    /// in sync. Otherwise the observed value must equal one of the
    /// accepted values; a never-checked property is out of sync.
    pub fn is_in_sync(&self) -> bool {
        match self.should.as_deref() {
            None | Some([]) => true,
            Some(should) => self.is.as_ref().is_some_and(|is| matches_any(is, should)),
        }
    }

    /// Render an observed value through the kind's formatter
    pub fn is_to_string(&self, value: &Value) -> Result<String> {
        self.kind
            .format_is(value)
            .map_err(|e| e.for_property(&self.name))
    }

    /// Render a desired value through the kind's formatter
    pub fn should_to_string(&self, value: &Value) -> Result<String> {
        self.kind
            .format_should(value)
            .map_err(|e| e.for_property(&self.name))
    }

    /// Describe a transition from `is` to `should` for audit logs.
    ///
    /// Domain errors from the formatters pass through unchanged; anything
    /// else is wrapped as an internal error.
    pub fn change_description(&self, is: &Value, should: &Value) -> Result<String> {
        let describe = || -> Result<String> {
            if is.is_absent() {
                Ok(format!(
                    "defined '{}' as '{}'",
                    self.name,
                    self.should_to_string(should)?
                ))
            } else if should.is_absent() {
                Ok(format!(
                    "undefined {} from '{}'",
                    self.name,
                    self.is_to_string(is)?
                ))
            } else {
                Ok(format!(
                    "{} changed '{}' to '{}'",
                    self.name,
                    self.is_to_string(is)?,
                    self.should_to_string(should)?
                ))
            }
        };

        describe().map_err(|err| {
            if err.is_domain() {
                err
            } else {
                Error::Internal(format!(
                    "could not describe change of {}: {err}",
                    self.path()
                ))
            }
        })
    }

    /// Check whether enforcement is disabled for this property
    pub fn is_noop(&self, ctx: &ReconcileContext) -> bool {
        self.noop || self.parent.noop || ctx.noop
    }

    /// Emit a log record at the parent's log level
    pub fn log(&self, ctx: &ReconcileContext, message: &str) -> Result<()> {
        let level = self.parent.log_level.ok_or_else(|| Error::NoLogLevel {
            resource: self.parent.to_string(),
        })?;

        ctx.logger.log(&LogRecord {
            level,
            message: message.to_string(),
            source: self.path(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MemoryLogger;
    use crate::kind::{FileMode, Integer};

    fn parent() -> Arc<Resource> {
        Arc::new(Resource::new("user", "bob", "users"))
    }

    fn prop(name: &str) -> Property {
        Property::builder(name).parent(parent()).build().unwrap()
    }

    #[test]
    fn test_requires_parent() {
        let err = Property::builder("uid").build().unwrap_err();
        assert!(matches!(err, Error::MissingParent { .. }));
        assert!(err.is_internal());
    }

    #[test]
    fn test_should_returns_first() {
        let mut p = prop("shell");
        p.set_should(vec!["/bin/zsh", "/bin/bash"]).unwrap();
        assert_eq!(p.should(), Some(&Value::from("/bin/zsh")));
        assert_eq!(
            p.should_original().unwrap(),
            &[Value::from("/bin/zsh"), Value::from("/bin/bash")]
        );
    }

    #[test]
    fn test_scalar_should_is_coerced() {
        let mut p = prop("comment");
        p.set_should("Bob Smith").unwrap();
        assert_eq!(p.should_values(), &[Value::from("Bob Smith")]);
        assert_eq!(p.should_original().unwrap().len(), 1);
    }

    #[test]
    fn test_should_unset() {
        let p = prop("comment");
        assert_eq!(p.should(), None);
        assert!(p.should_original().is_none());
        assert!(p.should_values().is_empty());
    }

    #[test]
    fn test_in_sync_when_unmanaged() {
        let mut p = prop("comment");
        assert!(p.is_in_sync());
        p.set_is(Value::from("anything"));
        assert!(p.is_in_sync());

        p.set_should(Vec::<Value>::new()).unwrap();
        assert!(p.is_in_sync());
    }

    #[test]
    fn test_in_sync_any_of() {
        let mut p = prop("shell");
        p.set_should(vec!["/bin/zsh", "/bin/bash"]).unwrap();
        assert!(!p.is_in_sync(), "never checked is out of sync");

        p.set_is(Value::from("/bin/bash"));
        assert!(p.is_in_sync());

        p.set_is(Value::from("/bin/sh"));
        assert!(!p.is_in_sync());

        p.set_is(Value::Absent);
        assert!(!p.is_in_sync());
    }

    #[test]
    fn test_failed_validation_is_atomic() {
        let mut p = Property::builder("uid")
            .parent(parent())
            .kind(Arc::new(Integer))
            .should(501_i64)
            .build()
            .unwrap();

        let err = p.set_should(vec![Value::Int(600), Value::from("staff")]).unwrap_err();
        assert!(err.is_domain());
        assert_eq!(p.should(), Some(&Value::Int(501)));
        assert_eq!(p.should_original().unwrap(), &[Value::Int(501)]);
    }

    #[test]
    fn test_munge_keeps_original() {
        let p = Property::builder("uid")
            .parent(parent())
            .kind(Arc::new(Integer))
            .should("501")
            .build()
            .unwrap();
        assert_eq!(p.should(), Some(&Value::Int(501)));
        assert_eq!(p.should_original().unwrap(), &[Value::from("501")]);
    }

    #[test]
    fn test_build_rejects_invalid_initial_should() {
        let err = Property::builder("uid")
            .parent(parent())
            .kind(Arc::new(Integer))
            .should("staff")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));
    }

    #[test]
    fn test_change_description() {
        let p = prop("x");
        assert_eq!(
            p.change_description(&Value::Absent, &Value::from("y")).unwrap(),
            "defined 'x' as 'y'"
        );
        assert_eq!(
            p.change_description(&Value::from("z"), &Value::Absent).unwrap(),
            "undefined x from 'z'"
        );
        assert_eq!(
            p.change_description(&Value::from("z"), &Value::from("y")).unwrap(),
            "x changed 'z' to 'y'"
        );
    }

    #[test]
    fn test_change_description_uses_kind_formatting() {
        let p = Property::builder("mode")
            .parent(parent())
            .kind(Arc::new(FileMode))
            .build()
            .unwrap();
        assert_eq!(
            p.change_description(&Value::Int(0o644), &Value::Int(0o755)).unwrap(),
            "mode changed '0644' to '0755'"
        );

        // Formatter domain errors pass through
        let err = p
            .change_description(&Value::from("rw-"), &Value::Int(0o755))
            .unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_format_errors_name_the_property() {
        let p = Property::builder("umask")
            .parent(parent())
            .kind(Arc::new(FileMode))
            .build()
            .unwrap();
        let err = p.is_to_string(&Value::from("rwx")).unwrap_err();
        assert!(
            matches!(&err, Error::InvalidValue { property, .. } if property == "umask"),
            "{err}"
        );
        let err = p
            .change_description(&Value::Int(0o22), &Value::from("rwx"))
            .unwrap_err();
        assert!(matches!(&err, Error::InvalidValue { property, .. } if property == "umask"));
    }

    #[test]
    fn test_is_noop_sources() {
        let logger = MemoryLogger::new();
        let ctx = ReconcileContext::new(&logger);

        assert!(!prop("uid").is_noop(&ctx));

        let own = Property::builder("uid").parent(parent()).noop(true).build().unwrap();
        assert!(own.is_noop(&ctx));

        let quiet_parent = Arc::new(Resource::new("user", "bob", "users").with_noop(true));
        let inherited = Property::builder("uid").parent(quiet_parent).build().unwrap();
        assert!(inherited.is_noop(&ctx));

        let global = ReconcileContext::new(&logger).with_noop(true);
        assert!(prop("uid").is_noop(&global));
    }

    #[test]
    fn test_log_requires_level() {
        let logger = MemoryLogger::new();
        let ctx = ReconcileContext::new(&logger);

        let err = prop("uid").log(&ctx, "hello").unwrap_err();
        assert!(matches!(err, Error::NoLogLevel { .. }));
        assert!(logger.records().is_empty());
    }

    #[test]
    fn test_log_emits_record() {
        let logger = MemoryLogger::new();
        let ctx = ReconcileContext::new(&logger);
        let res = Arc::new(Resource::new("user", "bob", "users").with_log_level(log::Level::Info));
        let p = Property::builder("uid").parent(res).build().unwrap();

        p.log(&ctx, "uid changed").unwrap();
        let records = logger.records();
        assert_eq!(
            records,
            vec![LogRecord {
                level: log::Level::Info,
                message: "uid changed".into(),
                source: "user[bob]/uid".into(),
            }]
        );
    }
}
