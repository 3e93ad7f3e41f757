//! Change reporting - audit strings and structured records for transitions

use crate::context::LogRecord;
use crate::error::Result;
use crate::property::Property;
use crate::resource::Resource;
use crate::value::Value;
use serde::Serialize;

/// A reported transition of one resource or property
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    /// Resource the change applies to, e.g. "user[bob]"
    pub resource: String,
    /// Property name; "ensure" for existence changes
    pub property: String,
    /// Event name, e.g. "comment_changed" or "user_created"
    pub event: String,
    /// Human-readable audit string
    pub description: String,
    /// Structured record for the logger
    pub record: LogRecord,
}

fn level_for(resource: &Resource) -> log::Level {
    resource.log_level.unwrap_or(log::Level::Info)
}

impl ChangeEvent {
    /// Report a property moving from `is` to `should`
    pub fn property_changed(property: &Property, is: &Value, should: &Value) -> Result<Self> {
        let description = property.change_description(is, should)?;
        Ok(Self::for_property(
            property,
            format!("{}_changed", property.name()),
            description,
        ))
    }

    /// Report a divergence that was not enforced because of no-op
    pub fn would_change(property: &Property, is: &Value, should: &Value) -> Result<Self> {
        let description = format!(
            "current_value '{}', should be '{}' (noop)",
            property.is_to_string(is)?,
            property.should_to_string(should)?
        );
        Ok(Self::for_property(
            property,
            format!("{}_noop", property.name()),
            description,
        ))
    }

    /// Report the object itself being created or removed
    pub fn ensure_changed(resource: &Resource, created: bool) -> Self {
        let (event, description) = if created {
            (format!("{}_created", resource.resource_type), "created")
        } else {
            (format!("{}_removed", resource.resource_type), "removed")
        };
        Self {
            resource: resource.to_string(),
            property: "ensure".to_string(),
            event,
            description: description.to_string(),
            record: LogRecord {
                level: level_for(resource),
                message: description.to_string(),
                source: format!("{resource}/ensure"),
            },
        }
    }

    /// Report a creation or removal that was not enforced because of no-op
    pub fn ensure_would_change(resource: &Resource, created: bool) -> Self {
        let mut event = Self::ensure_changed(resource, created);
        let action = if created { "created" } else { "removed" };
        event.event = format!("{}_noop", resource.resource_type);
        event.description = format!("would be {action} (noop)");
        event.record.message = event.description.clone();
        event
    }

    fn for_property(property: &Property, event: String, description: String) -> Self {
        Self {
            resource: property.parent().to_string(),
            property: property.name().to_string(),
            event,
            record: LogRecord {
                level: level_for(property.parent()),
                message: description.clone(),
                source: property.path(),
            },
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn comment() -> Property {
        let parent = Arc::new(Resource::new("user", "bob", "users"));
        Property::builder("comment")
            .parent(parent)
            .should("Bob Smith")
            .build()
            .unwrap()
    }

    #[test]
    fn test_property_changed() {
        let p = comment();
        let event =
            ChangeEvent::property_changed(&p, &Value::from("Bob"), &Value::from("Bob Smith"))
                .unwrap();
        assert_eq!(event.event, "comment_changed");
        assert_eq!(event.description, "comment changed 'Bob' to 'Bob Smith'");
        assert_eq!(event.resource, "user[bob]");
        assert_eq!(event.record.source, "user[bob]/comment");
        assert_eq!(event.record.level, log::Level::Info);
    }

    #[test]
    fn test_property_defined() {
        let p = comment();
        let event =
            ChangeEvent::property_changed(&p, &Value::Absent, &Value::from("Bob Smith")).unwrap();
        assert_eq!(event.description, "defined 'comment' as 'Bob Smith'");
    }

    #[test]
    fn test_would_change() {
        let p = comment();
        let event =
            ChangeEvent::would_change(&p, &Value::from("Bob"), &Value::from("Bob Smith")).unwrap();
        assert_eq!(event.event, "comment_noop");
        assert_eq!(
            event.description,
            "current_value 'Bob', should be 'Bob Smith' (noop)"
        );
    }

    #[test]
    fn test_ensure_changed_uses_resource_level() {
        let res = Resource::new("group", "staff", "groups").with_log_level(log::Level::Warn);
        let event = ChangeEvent::ensure_changed(&res, true);
        assert_eq!(event.event, "group_created");
        assert_eq!(event.record.level, log::Level::Warn);

        let removed = ChangeEvent::ensure_changed(&res, false);
        assert_eq!(removed.event, "group_removed");
        assert_eq!(removed.description, "removed");
    }

    #[test]
    fn test_ensure_would_change() {
        let res = Resource::new("user", "bob", "users");
        let event = ChangeEvent::ensure_would_change(&res, true);
        assert_eq!(event.event, "user_noop");
        assert_eq!(event.description, "would be created (noop)");
        assert_eq!(event.record.message, event.description);
    }
}
