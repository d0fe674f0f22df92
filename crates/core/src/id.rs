//! Strongly-typed identifiers used across the domain.
//!
//! Backend entities are keyed by 64-bit database ids; each entity kind gets its
//! own newtype so a volume id can never be handed to a zone lookup.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::CommandError;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(u64);

        impl $t {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl TryFrom<i64> for $t {
            type Error = CommandError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                u64::try_from(value)
                    .map(Self)
                    .map_err(|_| CommandError::execution(format!("{}: negative id {value}", $name)))
            }
        }

        impl FromStr for $t {
            type Err = CommandError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = u64::from_str(s)
                    .map_err(|e| CommandError::execution(format!("{}: {}", $name, e)))?;
                Ok(Self(raw))
            }
        }
    };
}

id_newtype!(
    /// Owning account of a resource; the unit audit entries are attributed to.
    AccountId,
    "AccountId"
);
id_newtype!(DomainId, "DomainId");
id_newtype!(ZoneId, "ZoneId");
id_newtype!(PodId, "PodId");
id_newtype!(ClusterId, "ClusterId");
id_newtype!(HostId, "HostId");
id_newtype!(VmId, "VmId");
id_newtype!(ServiceOfferingId, "ServiceOfferingId");
id_newtype!(VolumeId, "VolumeId");
id_newtype!(SnapshotId, "SnapshotId");
id_newtype!(GuestOsCategoryId, "GuestOsCategoryId");
id_newtype!(
    /// Port forwarding services are backed by security groups.
    PortForwardingServiceId,
    "PortForwardingServiceId"
);
id_newtype!(ManagementServerId, "ManagementServerId");

impl AccountId {
    /// Reserved account that owns system activity and unattributable requests.
    pub const SYSTEM: AccountId = AccountId(1);

    pub fn is_system(&self) -> bool {
        *self == Self::SYSTEM
    }
}
