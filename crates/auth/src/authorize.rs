use thiserror::Error;

use crate::{Permission, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("account {account} is not allowed to run {command}: missing permission '{permission}'")]
    Forbidden {
        account: String,
        command: String,
        permission: String,
    },
}

/// Command-side authorization contract (checked at the command boundary).
///
/// The dispatcher enforces this before binding results reach a backend.
pub trait CommandAuthorization {
    fn command_name(&self) -> &str;

    fn required_permission(&self) -> &Permission;
}

/// Authorize a principal for a command.
///
/// - No IO
/// - No panics
/// - Pure policy check
pub fn authorize<C>(principal: &Principal, command: &C) -> Result<(), AuthzError>
where
    C: CommandAuthorization + ?Sized,
{
    let required = command.required_permission();
    let granted = principal
        .effective_permissions()
        .iter()
        .any(|p| p.is_wildcard() || p == required);

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            account: principal.account_id.to_string(),
            command: command.command_name().to_string(),
            permission: required.as_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::catalog;
    use crate::Role;
    use nimbus_core::AccountId;

    struct Probe(Permission);

    impl CommandAuthorization for Probe {
        fn command_name(&self) -> &str {
            "probe"
        }

        fn required_permission(&self) -> &Permission {
            &self.0
        }
    }

    #[test]
    fn admin_wildcard_grants_everything() {
        let principal = Principal::new(AccountId::new(2), Role::Admin);
        assert!(authorize(&principal, &Probe(catalog::HOST_ADD)).is_ok());
    }

    #[test]
    fn user_is_denied_admin_commands() {
        let principal = Principal::new(AccountId::new(3), Role::User);
        let err = authorize(&principal, &Probe(catalog::HOST_ADD)).unwrap_err();
        assert_eq!(
            err,
            AuthzError::Forbidden {
                account: "3".to_string(),
                command: "probe".to_string(),
                permission: "host.add".to_string(),
            }
        );
    }

    #[test]
    fn explicit_grant_extends_role() {
        let principal =
            Principal::new(AccountId::new(3), Role::User).with_permission(catalog::HOST_ADD);
        assert!(authorize(&principal, &Probe(catalog::HOST_ADD)).is_ok());
    }
}
