//! # netinfo
//!
//! A provider for managing user and group properties stored in NetInfo,
//! the directory service of classic macOS and NeXTSTEP systems.
//!
//! Reads go through `nireport`, writes through `niutil`:
//!
//! | Operation | Command |
//! |-----------|---------|
//! | retrieve  | `nireport / /<container> name <key>` |
//! | create    | `niutil -create / /<container>/<name>` |
//! | destroy   | `niutil -destroy / /<container>/<name>` |
//! | modify    | `niutil -createprop / /<container>/<name> <key> '<value>'` |
//!
//! Before every read the lookup cache is flushed with
//! `lookupd -flushcache`. A failed flush is logged and the read goes
//! ahead; results may be stale.
//!
//! ## Example
//!
//! ```no_run
//! use declarative::{Property, Provider, ShellExecutor};
//! use netinfo::{NetInfoProvider, USER};
//! use std::sync::Arc;
//!
//! let provider = NetInfoProvider::new(&USER, Arc::new(ShellExecutor));
//! let mut comment = Property::builder("comment")
//!     .parent(Arc::new(USER.resource("bob")))
//!     .should("Bob Smith")
//!     .build()?;
//!
//! provider.retrieve(&mut comment)?;
//! if !comment.is_in_sync() {
//!     println!("{}", provider.modify_command(&comment)?);
//! }
//! # Ok::<(), declarative::Error>(())
//! ```

/// NetInfo provider implementation.
pub mod provider;
/// Parser for `nireport` output.
pub mod report;
/// Provider type descriptors and property kinds.
pub mod types;

pub use provider::NetInfoProvider;
pub use report::is_record_name;
pub use types::{GROUP, USER, for_resource_type, group_kinds, user_kinds};
