//! Step planning - order the commands that converge one resource

use declarative::Ensure;

use super::ResourceDiff;

/// One command-level step against a single resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Create the object
    Create,
    /// Destroy the object
    Destroy,
    /// Set one property to its desired value
    Modify { property: String },
}

impl Step {
    pub fn describe(&self) -> String {
        match self {
            Self::Create => "create".to_string(),
            Self::Destroy => "destroy".to_string(),
            Self::Modify { property } => format!("set {property}"),
        }
    }
}

/// Plan the steps for one resource.
///
/// A removal replaces all property work. A creation comes first and is
/// followed by every out-of-sync property. Properties of an object that
/// does not exist and is not ensured present are left alone.
pub fn plan(diff: &ResourceDiff) -> Vec<Step> {
    let modifies = || {
        diff.out_of_sync()
            .map(|p| Step::Modify {
                property: p.property.clone(),
            })
            .collect::<Vec<_>>()
    };

    match diff.ensure_change {
        Some(Ensure::Absent) => vec![Step::Destroy],
        Some(Ensure::Present) => {
            let mut steps = vec![Step::Create];
            steps.extend(modifies());
            steps
        }
        None if !diff.exists => {
            if diff.out_of_sync().next().is_some() {
                log::warn!(
                    "{} does not exist and is not ensured present, skipping properties",
                    diff.resource
                );
            }
            Vec::new()
        }
        None => modifies(),
    }
}
