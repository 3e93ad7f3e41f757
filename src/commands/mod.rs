//! Command implementations
//!
//! - `probe` - Check the directory tools
//! - `status` - Show current values vs desired values
//! - `apply` - Make current values match desired values

pub mod apply;
pub mod probe;
pub mod status;

use anyhow::{Result, bail};
use declarative::{CommandExecutor, Resource, ShellExecutor};
use std::sync::Arc;

use crate::Context;
use crate::config::Config;
use crate::engine::Target;
use crate::paths;

/// Executor for real runs
fn shell() -> Arc<dyn CommandExecutor> {
    Arc::new(ShellExecutor)
}

/// Load the config chosen on the command line, or the default one
fn load_config(ctx: &Context) -> Result<Config> {
    let path = paths::config_file(ctx.config.as_deref())?;
    log::info!("Loading config from {}", path.display());
    Config::load(&path)
}

/// Match a resource by bare name ("bob") or display name ("user[bob]")
fn matches_filter(resource: &Resource, filter: &str) -> bool {
    resource.name == filter || resource.to_string() == filter
}

/// Build targets from the config, keeping only those matching `filter`
fn select_targets(
    config: &Config,
    executor: &Arc<dyn CommandExecutor>,
    filter: Option<&str>,
) -> Result<Vec<Target>> {
    let targets = config.build_targets(executor)?;
    let Some(filter) = filter else {
        return Ok(targets);
    };

    let selected: Vec<Target> = targets
        .into_iter()
        .filter(|t| matches_filter(t.managed().resource(), filter))
        .collect();
    if selected.is_empty() {
        bail!("No configured resource matches '{filter}'");
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::ScriptedExecutor;

    const CONFIG: &str = r#"
[[resources]]
type = "user"
name = "bob"

[[resources]]
type = "group"
name = "bob"

[[resources]]
type = "user"
name = "alice"
"#;

    fn scripted() -> Arc<dyn CommandExecutor> {
        Arc::new(ScriptedExecutor::default())
    }

    #[test]
    fn test_matches_filter() {
        let resource = Resource::new("user", "bob", "users");
        assert!(matches_filter(&resource, "bob"));
        assert!(matches_filter(&resource, "user[bob]"));
        assert!(!matches_filter(&resource, "group[bob]"));
        assert!(!matches_filter(&resource, "alice"));
    }

    #[test]
    fn test_select_targets() {
        let config = Config::parse(CONFIG).unwrap();
        let exec = scripted();

        assert_eq!(select_targets(&config, &exec, None).unwrap().len(), 3);
        assert_eq!(select_targets(&config, &exec, Some("bob")).unwrap().len(), 2);

        let only = select_targets(&config, &exec, Some("group[bob]")).unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].managed().resource().resource_type, "group");
    }

    #[test]
    fn test_select_targets_no_match() {
        let config = Config::parse(CONFIG).unwrap();
        assert!(select_targets(&config, &scripted(), Some("carol")).is_err());
    }
}
