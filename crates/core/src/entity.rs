//! Raw backend entities.
//!
//! These are read-only snapshots handed to the command layer by backends and
//! lookups. The command layer never mutates or persists them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{
    AccountId, ClusterId, DomainId, GuestOsCategoryId, HostId, PodId, PortForwardingServiceId,
    ServiceOfferingId, SnapshotId, VmId, VolumeId, ZoneId,
};

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Name used in enrichment errors (`"zone"`, `"volume"`, ...).
    const KIND: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// An entity that belongs to exactly one account.
pub trait Owned {
    fn account_id(&self) -> AccountId;
}

macro_rules! impl_entity {
    ($t:ty, $id:ty, $kind:literal) => {
        impl Entity for $t {
            type Id = $id;
            const KIND: &'static str = $kind;

            fn id(&self) -> &Self::Id {
                &self.id
            }
        }
    };
}

macro_rules! impl_owned {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Owned for $t {
                fn account_id(&self) -> AccountId {
                    self.account_id
                }
            }
        )+
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub account_name: String,
    pub domain_id: DomainId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: DomainId,
    pub name: String,
}

/// A data center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pod {
    pub id: PodId,
    pub name: String,
    pub zone_id: ZoneId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub name: String,
    pub pod_id: PodId,
}

/// Compute sizing applied to VM instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: ServiceOfferingId,
    pub name: String,
    /// Virtual CPU count.
    pub cpu: u32,
    /// Per-CPU speed in MHz.
    pub speed: u32,
    /// Memory in MB.
    pub ram_size: u64,
}

impl ServiceOffering {
    /// Total MHz an instance of this offering reserves.
    pub fn cpu_capacity_mhz(&self) -> u64 {
        u64::from(self.cpu) * u64::from(self.speed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmInstance {
    pub id: VmId,
    pub name: String,
    pub account_id: AccountId,
    pub host_id: Option<HostId>,
    pub service_offering_id: ServiceOfferingId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolumeType {
    Root,
    Swap,
    Datadisk,
    Iso,
}

impl VolumeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeType::Root => "ROOT",
            VolumeType::Swap => "SWAP",
            VolumeType::Datadisk => "DATADISK",
            VolumeType::Iso => "ISO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub id: VolumeId,
    pub name: String,
    pub account_id: AccountId,
    pub volume_type: VolumeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SnapshotType {
    Manual,
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl SnapshotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotType::Manual => "MANUAL",
            SnapshotType::Hourly => "HOURLY",
            SnapshotType::Daily => "DAILY",
            SnapshotType::Weekly => "WEEKLY",
            SnapshotType::Monthly => "MONTHLY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub name: String,
    pub account_id: AccountId,
    pub volume_id: VolumeId,
    pub snapshot_type: SnapshotType,
    pub created: DateTime<Utc>,
}

/// Port forwarding service (a security group under the hood).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortForwardingService {
    pub id: PortForwardingServiceId,
    pub name: String,
    pub account_id: AccountId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestOsCategory {
    pub id: GuestOsCategoryId,
    pub name: String,
}

impl_entity!(Account, AccountId, "account");
impl_entity!(Domain, DomainId, "domain");
impl_entity!(Zone, ZoneId, "zone");
impl_entity!(Pod, PodId, "pod");
impl_entity!(Cluster, ClusterId, "cluster");
impl_entity!(ServiceOffering, ServiceOfferingId, "service offering");
impl_entity!(VmInstance, VmId, "vm instance");
impl_entity!(Volume, VolumeId, "volume");
impl_entity!(Snapshot, SnapshotId, "snapshot");
impl_entity!(PortForwardingService, PortForwardingServiceId, "port forwarding service");
impl_entity!(GuestOsCategory, GuestOsCategoryId, "guest os category");
impl_entity!(crate::host::Host, HostId, "host");

impl_owned!(VmInstance, Volume, Snapshot, PortForwardingService);
