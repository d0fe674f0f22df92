//! `nimbus-auth`: pure authorization boundary for commands.
//!
//! Decoupled from transport and storage.

pub mod authorize;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, CommandAuthorization, authorize};
pub use permissions::Permission;
pub use principal::Principal;
pub use roles::Role;
