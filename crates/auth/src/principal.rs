use serde::{Deserialize, Serialize};

use nimbus_core::AccountId;

use crate::{Permission, Role};

/// The authenticated caller a command runs on behalf of.
///
/// Construction is decoupled from transport: whatever verified the request
/// (API key signature, session) resolves the account and role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub account_id: AccountId,
    pub role: Role,
    /// Grants on top of the role's baseline.
    pub permissions: Vec<Permission>,
}

impl Principal {
    pub fn new(account_id: AccountId, role: Role) -> Self {
        Self {
            account_id,
            role,
            permissions: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// The system principal used for internally scheduled work.
    pub fn system() -> Self {
        Self::new(AccountId::SYSTEM, Role::Admin)
    }

    /// Role permissions plus explicit grants.
    pub fn effective_permissions(&self) -> Vec<Permission> {
        let mut perms = self.role.permissions();
        for p in &self.permissions {
            if !perms.contains(p) {
                perms.push(p.clone());
            }
        }
        perms
    }
}
