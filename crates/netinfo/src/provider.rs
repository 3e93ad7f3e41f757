//! NetInfo provider implementation.
//!
//! Shells out to `nireport` for reads and `niutil` for writes. Every
//! command is rebuilt from the resource identity on each call; the
//! provider itself holds no per-object state.

use std::sync::Arc;

use declarative::{
    Availability, CommandExecutor, Error, Property, Provider, ProviderType, Resource, Result,
    Value,
};

use crate::report;
use crate::types::{ADMIN_TOOL, FLUSH_CACHE_COMMAND, REPORT_TOOL, REQUIRED_TOOLS};

/// Structural edits addressed at a whole directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Create,
    Destroy,
}

impl Operation {
    fn flag(self) -> &'static str {
        match self {
            Operation::Create => "-create",
            Operation::Destroy => "-destroy",
        }
    }
}

/// Provider for one NetInfo object type (users or groups)
pub struct NetInfoProvider {
    provider_type: &'static ProviderType,
    executor: Arc<dyn CommandExecutor>,
    flush_cache: bool,
}

impl NetInfoProvider {
    pub fn new(provider_type: &'static ProviderType, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            provider_type,
            executor,
            flush_cache: true,
        }
    }

    /// Disable the lookup-cache flush before reads
    pub fn without_cache_flush(mut self) -> Self {
        self.flush_cache = false;
        self
    }

    /// Path of an entry, e.g. `/users/bob`
    fn entry_path(resource: &Resource) -> String {
        format!("/{}/{}", resource.container, resource.name)
    }

    fn entry_command(&self, operation: Operation, resource: &Resource) -> String {
        format!(
            "{ADMIN_TOOL} {} / {}",
            operation.flag(),
            Self::entry_path(resource)
        )
    }

    fn report_command(&self, resource: &Resource, key: &str) -> String {
        format!("{REPORT_TOOL} / /{} name {key}", resource.container)
    }
}

/// Wrap a value in single quotes for the shell
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

impl Provider for NetInfoProvider {
    fn provider_type(&self) -> &ProviderType {
        self.provider_type
    }

    fn probe(&self) -> Result<Availability> {
        for tool in REQUIRED_TOOLS {
            let output = self.executor.execute(&format!("which {tool}"))?;
            if !output.success() {
                log::debug!("{} unavailable: {tool} not found", self.provider_type.name);
                return Ok(Availability::Unavailable {
                    missing: (*tool).to_string(),
                });
            }
        }
        Ok(Availability::Available)
    }

    fn exists(&self, resource: &Resource) -> Result<bool> {
        let command = format!("{ADMIN_TOOL} -read / {}", Self::entry_path(resource));
        let output = self.executor.execute(&command)?;
        Ok(!output.stdout.trim().is_empty())
    }

    fn flush_cache(&self) {
        if !self.flush_cache {
            return;
        }
        match self.executor.execute(FLUSH_CACHE_COMMAND) {
            Ok(output) if output.success() => {}
            Ok(output) => log::warn!(
                "`{FLUSH_CACHE_COMMAND}` exited with {:?}, reads may be stale: {}",
                output.code,
                output.stderr.trim()
            ),
            Err(e) => log::warn!("could not flush lookup cache, reads may be stale: {e}"),
        }
    }

    fn retrieve(&self, property: &mut Property) -> Result<()> {
        self.flush_cache();

        let key = self.provider_type.resolve_key(property.name())?;
        let command = self.report_command(property.parent(), key);
        let output = self.executor.execute(&command)?;

        let value = report::find_value(&output.stdout, &property.parent().name, &command)?
            .map_or(Value::Absent, Value::from_observed);

        log::debug!("{} is {value:?}", property.path());
        property.set_is(value);
        Ok(())
    }

    fn add_command(&self, resource: &Resource) -> String {
        self.entry_command(Operation::Create, resource)
    }

    fn delete_command(&self, resource: &Resource) -> String {
        self.entry_command(Operation::Destroy, resource)
    }

    fn modify_command(&self, property: &Property) -> Result<String> {
        let key = self.provider_type.resolve_key(property.name())?;
        let should = property.should().ok_or_else(|| {
            Error::Internal(format!("{} has no desired value", property.path()))
        })?;
        let path = Self::entry_path(property.parent());

        Ok(match should {
            Value::Absent => format!("{ADMIN_TOOL} -destroyprop / {path} {key}"),
            value => format!(
                "{ADMIN_TOOL} -createprop / {path} {key} {}",
                quote(&value.to_string())
            ),
        })
    }
}
