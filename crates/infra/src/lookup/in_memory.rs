use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::RwLock;

use nimbus_core::{
    Account, AccountId, Cluster, ClusterId, Domain, DomainId, Entity, GuestOsCategory, Host,
    HostId, HostStats, Pod, PodId, PortForwardingService, PortForwardingServiceId,
    ServiceOffering, ServiceOfferingId, VmId, VmInstance, Volume, VolumeId, Zone, ZoneId,
};

use super::Lookup;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// One keyed table. A poisoned lock reads as empty and drops writes.
#[derive(Debug)]
struct Table<K, V>(RwLock<HashMap<K, V>>);

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self(RwLock::new(HashMap::new()))
    }
}

impl<K: Eq + Hash, V: Clone> Table<K, V> {
    fn get(&self, key: &K) -> Option<V> {
        self.0.read().ok()?.get(key).cloned()
    }

    fn put(&self, key: K, value: V) {
        if let Ok(mut rows) = self.0.write() {
            rows.insert(key, value);
        }
    }

    fn filter(&self, keep: impl Fn(&V) -> bool) -> Vec<V> {
        match self.0.read() {
            Ok(rows) => rows.values().filter(|v| keep(v)).cloned().collect(),
            Err(_) => vec![],
        }
    }
}

/// In-memory [`Lookup`] for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryLookup {
    accounts: Table<AccountId, Account>,
    domains: Table<DomainId, Domain>,
    zones: Table<ZoneId, Zone>,
    pods: Table<PodId, Pod>,
    clusters: Table<ClusterId, Cluster>,
    offerings: Table<ServiceOfferingId, ServiceOffering>,
    volumes: Table<VolumeId, Volume>,
    port_forwarding_services: Table<PortForwardingServiceId, PortForwardingService>,
    instances: Table<VmId, VmInstance>,
    guest_os: Table<HostId, GuestOsCategory>,
    stats: Table<HostId, HostStats>,
    local_storage: RwLock<HashSet<HostId>>,
}

impl InMemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_account(&self, account: Account) {
        self.accounts.put(*account.id(), account);
    }

    pub fn put_domain(&self, domain: Domain) {
        self.domains.put(*domain.id(), domain);
    }

    pub fn put_zone(&self, zone: Zone) {
        self.zones.put(*zone.id(), zone);
    }

    pub fn put_pod(&self, pod: Pod) {
        self.pods.put(*pod.id(), pod);
    }

    pub fn put_cluster(&self, cluster: Cluster) {
        self.clusters.put(*cluster.id(), cluster);
    }

    pub fn put_service_offering(&self, offering: ServiceOffering) {
        self.offerings.put(*offering.id(), offering);
    }

    pub fn put_volume(&self, volume: Volume) {
        self.volumes.put(*volume.id(), volume);
    }

    pub fn put_port_forwarding_service(&self, service: PortForwardingService) {
        self.port_forwarding_services.put(*service.id(), service);
    }

    pub fn put_instance(&self, instance: VmInstance) {
        self.instances.put(*instance.id(), instance);
    }

    pub fn put_guest_os_category(&self, host: HostId, category: GuestOsCategory) {
        self.guest_os.put(host, category);
    }

    pub fn put_host_stats(&self, host: HostId, stats: HostStats) {
        self.stats.put(host, stats);
    }

    pub fn mark_local_storage_active(&self, host: HostId) {
        if let Ok(mut set) = self.local_storage.write() {
            set.insert(host);
        }
    }
}

impl Lookup for InMemoryLookup {
    fn account(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id)
    }

    fn domain(&self, id: DomainId) -> Option<Domain> {
        self.domains.get(&id)
    }

    fn zone(&self, id: ZoneId) -> Option<Zone> {
        self.zones.get(&id)
    }

    fn pod(&self, id: PodId) -> Option<Pod> {
        self.pods.get(&id)
    }

    fn cluster(&self, id: ClusterId) -> Option<Cluster> {
        self.clusters.get(&id)
    }

    fn service_offering(&self, id: ServiceOfferingId) -> Option<ServiceOffering> {
        self.offerings.get(&id)
    }

    fn volume(&self, id: VolumeId) -> Option<Volume> {
        self.volumes.get(&id)
    }

    fn port_forwarding_service(
        &self,
        id: PortForwardingServiceId,
    ) -> Option<PortForwardingService> {
        self.port_forwarding_services.get(&id)
    }

    fn guest_os_category_for_host(&self, host: HostId) -> Option<GuestOsCategory> {
        self.guest_os.get(&host)
    }

    fn host_stats(&self, host: HostId) -> Option<HostStats> {
        self.stats.get(&host)
    }

    fn instances_on_host(&self, host: HostId) -> Vec<VmInstance> {
        let mut found = self.instances.filter(|vm| vm.host_id == Some(host));
        found.sort_by_key(|vm| vm.id);
        found
    }

    fn memory_allocated_on_host(&self, host: HostId) -> u64 {
        self.instances_on_host(host)
            .iter()
            .filter_map(|vm| self.offerings.get(&vm.service_offering_id))
            .map(|o| o.ram_size.saturating_mul(BYTES_PER_MB))
            .fold(0u64, u64::saturating_add)
    }

    fn local_storage_active(&self, host: &Host) -> bool {
        self.local_storage
            .read()
            .map(|set| set.contains(&host.id))
            .unwrap_or(false)
    }
}
