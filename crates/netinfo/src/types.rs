//! Provider type descriptors and property kinds for NetInfo objects.

use declarative::{AbsolutePath, Integer, KeyMap, KindRegistry, ProviderType};

/// Tool that reports a property across a directory
pub const REPORT_TOOL: &str = "nireport";

/// Tool that creates, destroys and edits directory entries
pub const ADMIN_TOOL: &str = "niutil";

/// Command that flushes the lookup cache before reads
pub const FLUSH_CACHE_COMMAND: &str = "lookupd -flushcache";

/// Executables every NetInfo provider needs
pub const REQUIRED_TOOLS: &[&str] = &[REPORT_TOOL, ADMIN_TOOL];

/// Users live under `/users`.
///
/// NetInfo calls the GECOS comment `realname` and the password hash
/// `passwd`.
pub const USER: ProviderType = ProviderType {
    name: "netinfo_user",
    resource_type: "user",
    container: "users",
    key_map: KeyMap::new(&[("comment", "realname"), ("password", "passwd")]),
    unsupported: &["ensure"],
};

/// Groups live under `/groups`.
pub const GROUP: ProviderType = ProviderType {
    name: "netinfo_group",
    resource_type: "group",
    container: "groups",
    key_map: KeyMap::new(&[]),
    unsupported: &["ensure"],
};

/// Property kinds for user properties
pub fn user_kinds() -> KindRegistry {
    KindRegistry::new()
        .with("uid", Integer)
        .with("gid", Integer)
        .with("home", AbsolutePath)
        .with("shell", AbsolutePath)
}

/// Property kinds for group properties
pub fn group_kinds() -> KindRegistry {
    KindRegistry::new().with("gid", Integer)
}

/// Look up a provider type by the resource type it manages
pub fn for_resource_type(resource_type: &str) -> Option<&'static ProviderType> {
    match resource_type {
        "user" => Some(&USER),
        "group" => Some(&GROUP),
        _ => None,
    }
}
