//! Parent resources and the properties they own
//!
//! A [`Resource`] is the read-only identity every property refers back
//! to: its type, name, container, no-op flag and log level. A
//! [`ManagedResource`] owns one property per property name, plus an
//! optional existence (`ensure`) requirement.

use crate::error::{Error, Result};
use crate::property::Property;
use std::fmt;
use std::sync::Arc;

/// Identity of a managed system object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Resource type (e.g. "user", "group")
    pub resource_type: String,
    /// Object name (e.g. "bob")
    pub name: String,
    /// Backend container the object lives in (e.g. "users")
    pub container: String,
    /// Disable enforcement for every property of this resource
    pub noop: bool,
    /// Level used when properties log; `None` disables property logging
    pub log_level: Option<log::Level>,
}

impl Resource {
    pub fn new(resource_type: &str, name: &str, container: &str) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            name: name.to_string(),
            container: container.to_string(),
            noop: false,
            log_level: None,
        }
    }

    pub fn with_noop(mut self, noop: bool) -> Self {
        self.noop = noop;
        self
    }

    pub fn with_log_level(mut self, level: log::Level) -> Self {
        self.log_level = Some(level);
        self
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.resource_type, self.name)
    }
}

/// Whether the object itself should exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensure {
    Present,
    Absent,
}

impl Ensure {
    /// Check whether an observed existence satisfies this requirement
    pub fn is_satisfied_by(&self, exists: bool) -> bool {
        match self {
            Ensure::Present => exists,
            Ensure::Absent => !exists,
        }
    }
}

/// A resource together with the properties it manages
#[derive(Debug)]
pub struct ManagedResource {
    resource: Arc<Resource>,
    ensure: Option<Ensure>,
    properties: Vec<Property>,
}

impl ManagedResource {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource: Arc::new(resource),
            ensure: None,
            properties: Vec::new(),
        }
    }

    pub fn with_ensure(mut self, ensure: Ensure) -> Self {
        self.ensure = Some(ensure);
        self
    }

    /// Shared handle to the identity, for building properties
    pub fn handle(&self) -> Arc<Resource> {
        Arc::clone(&self.resource)
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn ensure(&self) -> Option<Ensure> {
        self.ensure
    }

    /// Add a property, rejecting a second property with the same name
    /// or one built for a different resource.
    pub fn add_property(&mut self, property: Property) -> Result<()> {
        if !Arc::ptr_eq(property.parent_handle(), &self.resource) {
            return Err(Error::Internal(format!(
                "property '{}' belongs to {}, not {}",
                property.name(),
                property.parent(),
                self.resource
            )));
        }
        if self.property(property.name()).is_some() {
            return Err(Error::DuplicateProperty {
                resource: self.resource.to_string(),
                property: property.name().to_string(),
            });
        }
        self.properties.push(property);
        Ok(())
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut [Property] {
        &mut self.properties
    }
}
