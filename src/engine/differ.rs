//! Diff computation and display - observed vs desired values

use anyhow::Result;
use colored::Colorize;
use declarative::{Ensure, Property, Value};
use rayon::prelude::*;

use super::Target;

/// Observed state of one property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDiff {
    pub property: String,
    pub is: String,
    pub should: String,
    pub in_sync: bool,
}

impl PropertyDiff {
    fn from_property(property: &Property) -> Self {
        let is = property.is().map_or_else(
            || "(unchecked)".to_string(),
            |v| property.is_to_string(v).unwrap_or_else(|_| v.to_string()),
        );
        let should = property.should().map_or_else(
            || "(unmanaged)".to_string(),
            |v| property.should_to_string(v).unwrap_or_else(|_| v.to_string()),
        );
        Self {
            property: property.name().to_string(),
            is,
            should,
            in_sync: property.is_in_sync(),
        }
    }
}

/// Observed state of one resource
#[derive(Debug, Clone)]
pub struct ResourceDiff {
    /// Display name, e.g. "user[bob]"
    pub resource: String,
    pub exists: bool,
    /// Existence requirement that is not met, if any
    pub ensure_change: Option<Ensure>,
    pub properties: Vec<PropertyDiff>,
}

impl ResourceDiff {
    /// Properties whose observed value is not acceptable
    pub fn out_of_sync(&self) -> impl Iterator<Item = &PropertyDiff> {
        self.properties.iter().filter(|p| !p.in_sync)
    }

    pub fn has_changes(&self) -> bool {
        self.ensure_change.is_some() || self.out_of_sync().next().is_some()
    }
}

/// Retrieve every property of a target and compare with its desired values.
///
/// Objects that do not exist are not read; their properties are marked
/// absent.
pub fn inspect(target: &mut Target) -> declarative::Result<ResourceDiff> {
    let (managed, provider) = target.parts_mut();
    let exists = provider.exists(managed.resource())?;
    let ensure_change = managed
        .ensure()
        .filter(|ensure| !ensure.is_satisfied_by(exists));

    for property in managed.properties_mut() {
        if exists {
            provider.retrieve(property)?;
        } else {
            property.set_is(Value::Absent);
        }
    }

    Ok(ResourceDiff {
        resource: managed.resource().to_string(),
        exists,
        ensure_change,
        properties: managed
            .properties()
            .iter()
            .map(PropertyDiff::from_property)
            .collect(),
    })
}

/// Inspect all targets, independent resources in parallel
pub fn inspect_all(
    targets: &mut [Target],
    jobs: usize,
) -> Result<Vec<declarative::Result<ResourceDiff>>> {
    let pool = super::pool(jobs)?;
    Ok(pool.install(|| targets.par_iter_mut().map(inspect).collect()))
}

/// Display diffs in a user-friendly format
pub fn display_diff(diffs: &[ResourceDiff]) {
    let changed: Vec<&ResourceDiff> = diffs.iter().filter(|d| d.has_changes()).collect();

    if changed.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Property Diff".bold()
    );
    println!("│");

    for diff in &changed {
        println!("│ {}", diff.resource.bold());

        match diff.ensure_change {
            Some(Ensure::Present) => println!("│   {} (will create)", "+".green()),
            Some(Ensure::Absent) => println!("│   {} (will remove)", "-".red()),
            None => {}
        }

        if diff.ensure_change != Some(Ensure::Absent) {
            for property in diff.out_of_sync() {
                println!(
                    "│   {} {:<20} {}",
                    "~".yellow(),
                    property.property,
                    format!("{} → {}", property.is, property.should).dimmed()
                );
            }
        }
        println!("│");
    }

    let properties: usize = changed.iter().map(|d| d.out_of_sync().count()).sum();
    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Summary: {} resources, {} properties out of sync",
        changed.len().to_string().bold(),
        properties.to_string().yellow()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{ScriptedExecutor, user_target};
    use declarative::CommandOutput;
    use std::sync::Arc;

    #[test]
    fn test_inspect_existing_user() {
        let exec = Arc::new(
            ScriptedExecutor::default()
                .respond("niutil -read / /users/bob", CommandOutput::ok("name: bob\n"))
                .respond(
                    "nireport / /users name realname",
                    CommandOutput::ok("bob Bob\n"),
                )
                .respond("nireport / /users name uid", CommandOutput::ok("bob 501\n")),
        );
        let mut target = user_target(
            &exec,
            "bob",
            Some(Ensure::Present),
            &[("comment", "Bob Smith".into()), ("uid", 501_i64.into())],
        );

        let diff = inspect(&mut target).unwrap();
        assert!(diff.exists);
        assert_eq!(diff.ensure_change, None);

        let out: Vec<&str> = diff.out_of_sync().map(|p| p.property.as_str()).collect();
        assert_eq!(out, vec!["comment"]);

        let comment = &diff.properties[0];
        assert_eq!(comment.is, "Bob");
        assert_eq!(comment.should, "Bob Smith");
    }

    #[test]
    fn test_inspect_missing_user_skips_reads() {
        let exec = Arc::new(ScriptedExecutor::default());
        let mut target = user_target(
            &exec,
            "carol",
            Some(Ensure::Present),
            &[("uid", 502_i64.into())],
        );

        let diff = inspect(&mut target).unwrap();
        assert!(!diff.exists);
        assert_eq!(diff.ensure_change, Some(Ensure::Present));
        assert_eq!(diff.properties[0].is, "absent");
        assert!(!exec.history().iter().any(|c| c.starts_with("nireport")));
    }

    #[test]
    fn test_inspect_propagates_parse_failure() {
        let exec = Arc::new(
            ScriptedExecutor::default()
                .respond("niutil -read / /users/bob", CommandOutput::ok("name: bob\n"))
                .respond("nireport / /users name uid", CommandOutput::ok("garbage\n")),
        );
        let mut target = user_target(&exec, "bob", None, &[("uid", 501_i64.into())]);
        assert!(inspect(&mut target).is_err());
    }

    #[test]
    fn test_inspect_all_keeps_order() {
        let exec = Arc::new(ScriptedExecutor::default());
        let mut targets = vec![
            user_target(&exec, "a", None, &[]),
            user_target(&exec, "b", None, &[]),
            user_target(&exec, "c", None, &[]),
        ];
        let diffs = inspect_all(&mut targets, 2).unwrap();
        let names: Vec<String> = diffs
            .into_iter()
            .map(|d| d.unwrap().resource)
            .collect();
        assert_eq!(names, vec!["user[a]", "user[b]", "user[c]"]);
    }
}
