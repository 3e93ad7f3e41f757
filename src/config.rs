//! Declarative configuration: which resources to manage and how
//!
//! ```toml
//! noop = false
//! jobs = 4
//! log_level = "info"
//!
//! [[resources]]
//! type = "user"
//! name = "bob"
//! ensure = "present"
//!
//! [resources.properties]
//! comment = "Bob Smith"
//! uid = 501
//! shell = ["/bin/zsh", "/bin/bash"]
//! ```

use anyhow::{Context, Result, bail};
use declarative::{
    CommandExecutor, Ensure, KindRegistry, ManagedResource, Property, Provider, Value,
};
use netinfo::NetInfoProvider;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::engine::Target;

/// Top-level config file
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Report changes without enforcing them
    #[serde(default)]
    pub noop: bool,

    /// Number of resources processed in parallel
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Default log level for resources ("off" disables property logging)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Flush the lookup cache before every read
    #[serde(default = "default_flush_cache")]
    pub flush_cache: bool,

    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            noop: false,
            jobs: default_jobs(),
            log_level: default_log_level(),
            flush_cache: default_flush_cache(),
            resources: Vec::new(),
        }
    }
}

fn default_jobs() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_flush_cache() -> bool {
    true
}

/// One managed user or group
#[derive(Debug, Serialize, Deserialize)]
pub struct ResourceConfig {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub ensure: Option<EnsureConfig>,
    #[serde(default)]
    pub noop: bool,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnsureConfig {
    Present,
    Absent,
}

impl From<EnsureConfig> for Ensure {
    fn from(ensure: EnsureConfig) -> Self {
        match ensure {
            EnsureConfig::Present => Ensure::Present,
            EnsureConfig::Absent => Ensure::Absent,
        }
    }
}

/// A desired property value: a scalar or a list of acceptable scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Int(i64),
    Text(String),
    List(Vec<Scalar>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Text(String),
}

impl From<&Scalar> for Value {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Int(n) => Value::Int(*n),
            Scalar::Text(s) => Value::Text(s.clone()),
        }
    }
}

impl PropertyValue {
    fn to_values(&self) -> Vec<Value> {
        match self {
            PropertyValue::Int(n) => vec![Value::Int(*n)],
            PropertyValue::Text(s) => vec![Value::Text(s.clone())],
            PropertyValue::List(items) => items.iter().map(Value::from).collect(),
        }
    }
}

/// Parse a log level name; "off" means no property logging
pub fn parse_log_level(level: &str) -> Result<Option<log::Level>> {
    if level.eq_ignore_ascii_case("off") {
        return Ok(None);
    }
    level
        .parse::<log::Level>()
        .map(Some)
        .with_context(|| format!("Invalid log level: {level}"))
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Parse config from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid TOML format")?;
        if config.jobs == 0 {
            bail!("jobs must be at least 1");
        }
        Ok(config)
    }

    /// Build a target (resource, properties, provider) per configured resource
    pub fn build_targets(&self, executor: &Arc<dyn CommandExecutor>) -> Result<Vec<Target>> {
        let default_level = parse_log_level(&self.log_level)?;
        self.resources
            .iter()
            .map(|res| self.build_target(res, default_level, executor))
            .collect()
    }

    fn build_target(
        &self,
        config: &ResourceConfig,
        default_level: Option<log::Level>,
        executor: &Arc<dyn CommandExecutor>,
    ) -> Result<Target> {
        let Some(provider_type) = netinfo::for_resource_type(&config.resource_type) else {
            bail!(
                "Unknown resource type '{}' for '{}' (expected user or group)",
                config.resource_type,
                config.name
            );
        };

        if !netinfo::is_record_name(&config.name) {
            bail!(
                "Invalid {} name '{}' (letters, digits and underscores only)",
                config.resource_type,
                config.name
            );
        }

        let level = match &config.log_level {
            Some(level) => parse_log_level(level)?,
            None => default_level,
        };

        let mut resource = provider_type.resource(&config.name).with_noop(config.noop);
        resource.log_level = level;

        let mut managed = ManagedResource::new(resource);
        if let Some(ensure) = config.ensure {
            managed = managed.with_ensure(ensure.into());
        }

        let kinds = kinds_for(&config.resource_type);
        for (name, value) in &config.properties {
            let property = Property::builder(name)
                .parent(managed.handle())
                .kind(kinds.resolve(name))
                .should(value.to_values())
                .build()
                .with_context(|| format!("Invalid property {}/{}", managed.resource(), name))?;
            managed.add_property(property)?;
        }

        let mut provider = NetInfoProvider::new(provider_type, Arc::clone(executor));
        if !self.flush_cache {
            provider = provider.without_cache_flush();
        }
        let provider: Arc<dyn Provider> = Arc::new(provider);

        Ok(Target::new(managed, provider))
    }
}

fn kinds_for(resource_type: &str) -> KindRegistry {
    match resource_type {
        "group" => netinfo::group_kinds(),
        _ => netinfo::user_kinds(),
    }
}
