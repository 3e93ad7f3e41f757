//! Reconciliation engine for propsync
//!
//! The engine orchestrates:
//! 1. Diffing - retrieve observed values and find divergence
//! 2. Planning - order the commands that converge one resource
//! 3. Executing - run commands, re-read, and report each change

pub mod differ;
pub mod executor;
pub mod planner;

use anyhow::{Context, Result};
use declarative::{ManagedResource, Provider};
use std::sync::Arc;

pub use differ::{ResourceDiff, inspect, inspect_all};
pub use executor::{ExecuteOptions, execute};
pub use planner::{Step, plan};

/// A managed resource paired with the provider that reconciles it
pub struct Target {
    managed: ManagedResource,
    provider: Arc<dyn Provider>,
}

impl Target {
    pub fn new(managed: ManagedResource, provider: Arc<dyn Provider>) -> Self {
        Self { managed, provider }
    }

    pub fn managed(&self) -> &ManagedResource {
        &self.managed
    }

    /// Split borrow: mutable resource, shared provider
    pub(crate) fn parts_mut(&mut self) -> (&mut ManagedResource, &dyn Provider) {
        (&mut self.managed, self.provider.as_ref())
    }
}

/// Thread pool for processing independent resources
fn pool(jobs: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()
        .context("Failed to create thread pool")
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted executor shared by engine tests

    use super::Target;
    use declarative::{
        CommandExecutor, CommandOutput, Desired, Ensure, ManagedResource, Property, Result,
    };
    use netinfo::{NetInfoProvider, USER, user_kinds};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Build a user target backed by `exec`, without cache flushing
    pub fn user_target(
        exec: &Arc<ScriptedExecutor>,
        name: &str,
        ensure: Option<Ensure>,
        properties: &[(&str, Desired)],
    ) -> Target {
        let mut managed = ManagedResource::new(
            USER.resource(name).with_log_level(log::Level::Info),
        );
        if let Some(ensure) = ensure {
            managed = managed.with_ensure(ensure);
        }
        let kinds = user_kinds();
        for (prop, should) in properties {
            let property = Property::builder(prop)
                .parent(managed.handle())
                .kind(kinds.resolve(prop))
                .should(should.clone())
                .build()
                .unwrap();
            managed.add_property(property).unwrap();
        }
        let provider = NetInfoProvider::new(&USER, exec.clone()).without_cache_flush();
        Target::new(managed, Arc::new(provider))
    }

    /// Answers commands from a table; unknown commands succeed silently.
    /// Responses can be swapped after a command runs, so a read after a
    /// write sees the new value.
    #[derive(Default)]
    pub struct ScriptedExecutor {
        responses: Mutex<HashMap<String, CommandOutput>>,
        after: Mutex<HashMap<String, (String, CommandOutput)>>,
        history: Mutex<Vec<String>>,
    }

    impl ScriptedExecutor {
        pub fn respond(self, command: &str, output: CommandOutput) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(command.to_string(), output);
            self
        }

        /// Once `trigger` runs, `command` answers with `output`
        pub fn after(self, trigger: &str, command: &str, output: CommandOutput) -> Self {
            self.after
                .lock()
                .unwrap()
                .insert(trigger.to_string(), (command.to_string(), output));
            self
        }

        pub fn history(&self) -> Vec<String> {
            self.history.lock().unwrap().clone()
        }

        pub fn ran(&self, command: &str) -> bool {
            self.history().iter().any(|c| c == command)
        }
    }

    impl CommandExecutor for ScriptedExecutor {
        fn execute(&self, command: &str) -> Result<CommandOutput> {
            self.history.lock().unwrap().push(command.to_string());
            let output = self
                .responses
                .lock()
                .unwrap()
                .get(command)
                .cloned()
                .unwrap_or_else(|| CommandOutput::ok(""));
            if let Some((next, next_output)) = self.after.lock().unwrap().remove(command) {
                self.responses.lock().unwrap().insert(next, next_output);
            }
            Ok(output)
        }
    }
}
