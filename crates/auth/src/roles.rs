use serde::{Deserialize, Serialize};

use crate::permissions::{Permission, catalog};

/// Account role. Decides the baseline permission set of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Root administrator; holds the wildcard.
    Admin,
    /// Administers the accounts of one domain.
    DomainAdmin,
    User,
    /// Observes resources; runs no mutating command.
    ReadOnly,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::DomainAdmin => "domain_admin",
            Role::User => "user",
            Role::ReadOnly => "read_only",
        }
    }

    /// Permissions granted by the role alone.
    pub fn permissions(&self) -> Vec<Permission> {
        match self {
            Role::Admin => vec![Permission::WILDCARD],
            Role::DomainAdmin | Role::User => vec![
                catalog::SNAPSHOT_CREATE,
                catalog::PORT_FORWARDING_SERVICE_DELETE,
            ],
            Role::ReadOnly => vec![],
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
