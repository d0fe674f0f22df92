//! Read-only entity lookups used for attribution and response enrichment.
//!
//! Every lookup may come back empty. Callers decide whether absence is
//! acceptable (optional enrichment) or a data-consistency defect
//! ([`require`]).

pub mod in_memory;

pub use in_memory::InMemoryLookup;

use nimbus_commands::{OwnerLookup, OwnerRef};
use nimbus_core::{
    Account, AccountId, Cluster, ClusterId, CommandError, CommandResult, Domain, DomainId, Entity,
    GuestOsCategory, Host, HostId, HostStats, Owned, Pod, PodId, PortForwardingService,
    PortForwardingServiceId, ServiceOffering, ServiceOfferingId, VmInstance, Volume, VolumeId,
    Zone, ZoneId,
};

/// Account/zone/pod/cluster/offering lookup service.
///
/// Implementations must be read-only and safe to call from concurrent
/// requests.
pub trait Lookup: Send + Sync {
    fn account(&self, id: AccountId) -> Option<Account>;
    fn domain(&self, id: DomainId) -> Option<Domain>;
    fn zone(&self, id: ZoneId) -> Option<Zone>;
    fn pod(&self, id: PodId) -> Option<Pod>;
    fn cluster(&self, id: ClusterId) -> Option<Cluster>;
    fn service_offering(&self, id: ServiceOfferingId) -> Option<ServiceOffering>;
    fn volume(&self, id: VolumeId) -> Option<Volume>;
    fn port_forwarding_service(&self, id: PortForwardingServiceId)
    -> Option<PortForwardingService>;

    fn guest_os_category_for_host(&self, host: HostId) -> Option<GuestOsCategory>;
    /// Latest agent statistics; absent when the agent has not reported.
    fn host_stats(&self, host: HostId) -> Option<HostStats>;
    /// Instances placed on the host, ordered by id.
    fn instances_on_host(&self, host: HostId) -> Vec<VmInstance>;
    /// Memory reserved on the host by system and user instances, in bytes.
    fn memory_allocated_on_host(&self, host: HostId) -> u64;
    fn local_storage_active(&self, host: &Host) -> bool;
}

impl<T> Lookup for std::sync::Arc<T>
where
    T: Lookup + ?Sized,
{
    fn account(&self, id: AccountId) -> Option<Account> {
        (**self).account(id)
    }

    fn domain(&self, id: DomainId) -> Option<Domain> {
        (**self).domain(id)
    }

    fn zone(&self, id: ZoneId) -> Option<Zone> {
        (**self).zone(id)
    }

    fn pod(&self, id: PodId) -> Option<Pod> {
        (**self).pod(id)
    }

    fn cluster(&self, id: ClusterId) -> Option<Cluster> {
        (**self).cluster(id)
    }

    fn service_offering(&self, id: ServiceOfferingId) -> Option<ServiceOffering> {
        (**self).service_offering(id)
    }

    fn volume(&self, id: VolumeId) -> Option<Volume> {
        (**self).volume(id)
    }

    fn port_forwarding_service(
        &self,
        id: PortForwardingServiceId,
    ) -> Option<PortForwardingService> {
        (**self).port_forwarding_service(id)
    }

    fn guest_os_category_for_host(&self, host: HostId) -> Option<GuestOsCategory> {
        (**self).guest_os_category_for_host(host)
    }

    fn host_stats(&self, host: HostId) -> Option<HostStats> {
        (**self).host_stats(host)
    }

    fn instances_on_host(&self, host: HostId) -> Vec<VmInstance> {
        (**self).instances_on_host(host)
    }

    fn memory_allocated_on_host(&self, host: HostId) -> u64 {
        (**self).memory_allocated_on_host(host)
    }

    fn local_storage_active(&self, host: &Host) -> bool {
        (**self).local_storage_active(host)
    }
}

/// Resolve a required related entity or fail with an enrichment error.
pub fn require<E: Entity>(found: Option<E>, id: E::Id) -> CommandResult<E> {
    found.ok_or_else(|| CommandError::enrichment(E::KIND, id))
}

/// Adapts a [`Lookup`] to the owner resolution async commands need.
pub struct OwnerResolver<'a, L: ?Sized>(pub &'a L);

impl<L> OwnerLookup for OwnerResolver<'_, L>
where
    L: Lookup + ?Sized,
{
    fn owner_of(&self, reference: OwnerRef, id: u64) -> Option<AccountId> {
        match reference {
            OwnerRef::Volume => self.0.volume(VolumeId::new(id)).map(|v| v.account_id()),
            OwnerRef::PortForwardingService => self
                .0
                .port_forwarding_service(PortForwardingServiceId::new(id))
                .map(|s| s.account_id()),
        }
    }
}
