//! # Declarative
//!
//! Property-level reconciliation for declarative system configuration.
//!
//! A [`Property`] models one observable attribute of a managed object (a
//! user's shell, a group's gid): the values an operator accepts
//! (`should`), the value last observed (`is`), and whether the two agree.
//! A [`Provider`] turns properties into backend command lines; running
//! those commands is left to a [`CommandExecutor`].
//!
//! ## Core Concepts
//!
//! - **Resource**: identity of a managed object (type, name, container)
//! - **Property**: one managed attribute, owned by a resource
//! - **PropertyKind**: optional validate/munge/format hooks per property
//! - **Provider**: stateless translator from properties to commands
//! - **ChangeEvent**: audit string plus structured record for a transition
//!
//! ## Example
//!
//! ```
//! use declarative::{Property, Resource, Value};
//! use std::sync::Arc;
//!
//! let bob = Arc::new(Resource::new("user", "bob", "users"));
//! let mut shell = Property::builder("shell")
//!     .parent(bob)
//!     .should(vec!["/bin/zsh", "/bin/bash"])
//!     .build()?;
//!
//! shell.set_is(Value::from("/bin/bash"));
//! assert!(shell.is_in_sync());
//! # Ok::<(), declarative::Error>(())
//! ```

pub mod change;
pub mod command;
pub mod context;
pub mod error;
pub mod kind;
pub mod matcher;
pub mod property;
pub mod provider;
pub mod resource;
pub mod value;

// Re-export main types at crate root
pub use change::ChangeEvent;
pub use command::{CommandExecutor, CommandOutput, ShellExecutor};
pub use context::{LogFacade, LogRecord, Logger, MemoryLogger, ReconcileContext};
pub use error::{Error, Result};
pub use kind::{AbsolutePath, FileMode, Integer, KindRegistry, Plain, PropertyKind};
pub use matcher::matches_any;
pub use property::{Property, PropertyBuilder};
pub use provider::{Availability, KeyMap, Provider, ProviderType};
pub use resource::{Ensure, ManagedResource, Resource};
pub use value::{Desired, Value};
