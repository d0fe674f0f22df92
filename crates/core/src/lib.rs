//! `nimbus-core`: shared building blocks for the command layer.
//!
//! Identifiers, the command error taxonomy and the raw entities backends hand
//! back. No IO lives here.

pub mod entity;
pub mod error;
pub mod host;
pub mod id;

pub use entity::{
    Account, Cluster, Domain, Entity, GuestOsCategory, Owned, Pod, PortForwardingService,
    ServiceOffering, Snapshot, SnapshotType, VmInstance, Volume, VolumeType, Zone,
};
pub use error::{CommandError, CommandResult};
pub use host::{Host, HostEvent, HostStats, HostStatus, HostType};
pub use id::{
    AccountId, ClusterId, DomainId, GuestOsCategoryId, HostId, ManagementServerId, PodId,
    PortForwardingServiceId, ServiceOfferingId, SnapshotId, VmId, VolumeId, ZoneId,
};
