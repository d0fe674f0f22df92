use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque dotted strings (e.g. "snapshot.create"). The
/// wildcard `"*"` grants everything and is held by the admin role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Const constructor for catalogue tables.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Permissions referenced by the command catalogue.
pub mod catalog {
    use super::Permission;

    pub const HOST_ADD: Permission = Permission::from_static("host.add");
    pub const SNAPSHOT_CREATE: Permission = Permission::from_static("snapshot.create");
    pub const PORT_FORWARDING_SERVICE_DELETE: Permission =
        Permission::from_static("network.portforwardingservice.delete");
}
