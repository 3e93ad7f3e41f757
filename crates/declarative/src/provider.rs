//! Provider contract - translating properties into backend commands
//!
//! A provider is stateless: every command is rebuilt from the parent's
//! identity, the resolved backend key and the current desired value.
//! Per-type configuration (container, key mapping) lives in a static
//! [`ProviderType`] descriptor and never changes at runtime.

use crate::error::{Error, Result};
use crate::property::Property;
use crate::resource::Resource;

/// Result of checking for a provider's external tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    /// A required executable is missing
    Unavailable { missing: String },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Immutable table from property name to backend attribute key
#[derive(Debug, Clone, Copy)]
pub struct KeyMap {
    entries: &'static [(&'static str, &'static str)],
}

impl KeyMap {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Look up an explicit mapping
    pub fn get(&self, property: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, key)| *key)
    }
}

/// Static description of a provider type
#[derive(Debug, Clone, Copy)]
pub struct ProviderType {
    /// Provider name, e.g. "netinfo_user"
    pub name: &'static str,
    /// Resource type it manages, e.g. "user"
    pub resource_type: &'static str,
    /// Container objects of this type live in, e.g. "users"
    pub container: &'static str,
    pub key_map: KeyMap,
    /// Properties the backend cannot manage at all
    pub unsupported: &'static [&'static str],
}

impl ProviderType {
    /// Resolve the backend key for a property name.
    ///
    /// Unmapped names fall back to themselves. Unsupported or empty names
    /// do not resolve, which is a provider configuration fault.
    pub fn resolve_key<'a>(&self, property: &'a str) -> Result<&'a str> {
        if property.is_empty() || self.unsupported.iter().any(|name| *name == property) {
            return Err(Error::UnresolvedKey {
                provider: self.name.to_string(),
                property: property.to_string(),
            });
        }
        Ok(self.key_map.get(property).unwrap_or(property))
    }

    /// Build the identity of an object of this type
    pub fn resource(&self, name: &str) -> Resource {
        Resource::new(self.resource_type, name, self.container)
    }
}

/// Backend-specific translator from property semantics to commands
pub trait Provider: Send + Sync {
    /// Static descriptor for this provider
    fn provider_type(&self) -> &ProviderType;

    /// Check that the external tools this provider needs are installed
    fn probe(&self) -> Result<Availability>;

    /// Check whether the object exists on the target.
    ///
    /// "Not found" is a normal `Ok(false)`; only a launch failure errors.
    fn exists(&self, resource: &Resource) -> Result<bool>;

    /// Flush any backend lookup cache before reading; failures are logged
    fn flush_cache(&self) {}

    /// Read the current value of a property into its `is`
    fn retrieve(&self, property: &mut Property) -> Result<()>;

    /// Command that creates the object
    fn add_command(&self, resource: &Resource) -> String;

    /// Command that destroys the object
    fn delete_command(&self, resource: &Resource) -> String;

    /// Command that sets the property to its canonical desired value
    fn modify_command(&self, property: &Property) -> Result<String>;
}
