//! Host projection.
//!
//! Turns a discovered [`Host`] into the client-facing [`HostResponse`],
//! joining zone, pod, cluster, guest OS category, live statistics and the
//! instances placed on the host.

use chrono::{DateTime, Utc};
use serde::Serialize;

use nimbus_core::{
    ClusterId, CommandResult, GuestOsCategoryId, Host, HostEvent, HostId, HostType,
    ManagementServerId, PodId, ZoneId,
};

use crate::lookup::{Lookup, require};
use crate::projections::percent;

/// Delimiter used when rendering the possible-events set.
pub const EVENT_DELIMITER: &str = "; ";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostResponse {
    pub id: HostId,
    pub name: String,
    pub state: &'static str,
    #[serde(rename = "type")]
    pub host_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<String>,
    #[serde(rename = "ipaddress", skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypervisor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(rename = "zoneid")]
    pub zone_id: ZoneId,
    #[serde(rename = "zonename")]
    pub zone_name: String,
    #[serde(rename = "podid", skip_serializing_if = "Option::is_none")]
    pub pod_id: Option<PodId>,
    #[serde(rename = "podname", skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
    #[serde(rename = "clusterid", skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<ClusterId>,
    #[serde(rename = "clustername", skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,

    #[serde(rename = "oscategoryid", skip_serializing_if = "Option::is_none")]
    pub os_category_id: Option<GuestOsCategoryId>,
    #[serde(rename = "oscategoryname", skip_serializing_if = "Option::is_none")]
    pub os_category_name: Option<String>,

    #[serde(rename = "cpunumber")]
    pub cpu_number: u32,
    #[serde(rename = "cpuspeed")]
    pub cpu_speed: u32,
    #[serde(rename = "cpuallocated")]
    pub cpu_allocated: String,
    #[serde(rename = "cpuused", skip_serializing_if = "Option::is_none")]
    pub cpu_used: Option<String>,
    #[serde(rename = "averageload", skip_serializing_if = "Option::is_none")]
    pub average_load: Option<i64>,
    #[serde(rename = "networkkbsread", skip_serializing_if = "Option::is_none")]
    pub network_kbs_read: Option<i64>,
    #[serde(rename = "networkkbswrite", skip_serializing_if = "Option::is_none")]
    pub network_kbs_write: Option<i64>,

    #[serde(rename = "memorytotal", skip_serializing_if = "Option::is_none")]
    pub memory_total: Option<u64>,
    #[serde(rename = "memoryallocated", skip_serializing_if = "Option::is_none")]
    pub memory_allocated: Option<u64>,
    #[serde(rename = "memoryused", skip_serializing_if = "Option::is_none")]
    pub memory_used: Option<u64>,
    #[serde(rename = "disksizetotal", skip_serializing_if = "Option::is_none")]
    pub disk_size_total: Option<u64>,
    #[serde(rename = "disksizeallocated", skip_serializing_if = "Option::is_none")]
    pub disk_size_allocated: Option<u64>,

    #[serde(rename = "localstorageactive")]
    pub local_storage_active: bool,
    #[serde(rename = "managementserverid", skip_serializing_if = "Option::is_none")]
    pub management_server_id: Option<ManagementServerId>,
    pub created: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<DateTime<Utc>>,
    #[serde(rename = "disconnected", skip_serializing_if = "Option::is_none")]
    pub disconnected_on: Option<DateTime<Utc>>,
    #[serde(rename = "lastpinged", skip_serializing_if = "Option::is_none")]
    pub last_pinged: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<String>,
}

/// Type-conditional capacity fields. At most one group applies per host type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capacity {
    Memory {
        total: Option<u64>,
        allocated: u64,
        used: u64,
    },
    Disk {
        total: Option<u64>,
        allocated: u64,
    },
    NotApplicable,
}

impl Capacity {
    /// Branches on the host type once. A total the host never recorded stays
    /// absent; allocated figures are always present for the matching group.
    fn for_host(host: &Host, lookup: &(impl Lookup + ?Sized)) -> Self {
        match host.host_type {
            HostType::Routing => {
                let allocated = lookup.memory_allocated_on_host(host.id);
                Capacity::Memory {
                    total: host.total_memory,
                    allocated,
                    used: allocated,
                }
            }
            HostType::Storage => Capacity::Disk {
                total: host.total_size,
                allocated: 0,
            },
            HostType::SecondaryStorage
            | HostType::ConsoleProxy
            | HostType::ExternalFirewall
            | HostType::ExternalLoadBalancer
            | HostType::PxeServer
            | HostType::TrafficMonitor => Capacity::NotApplicable,
        }
    }

    fn memory(self) -> (Option<u64>, Option<u64>, Option<u64>) {
        match self {
            Capacity::Memory {
                total,
                allocated,
                used,
            } => (total, Some(allocated), Some(used)),
            _ => (None, None, None),
        }
    }

    fn disk(self) -> (Option<u64>, Option<u64>) {
        match self {
            Capacity::Disk { total, allocated } => (total, Some(allocated)),
            _ => (None, None),
        }
    }
}

/// Join events in the order given; `None` for an empty set.
pub fn join_events(events: &[HostEvent]) -> Option<String> {
    if events.is_empty() {
        return None;
    }
    Some(
        events
            .iter()
            .map(HostEvent::as_str)
            .collect::<Vec<_>>()
            .join(EVENT_DELIMITER),
    )
}

/// Sum of `cpu * speed` over the offerings of instances placed on the host.
fn allocated_mhz(host: &Host, lookup: &(impl Lookup + ?Sized)) -> CommandResult<u64> {
    let mut total = 0u64;
    for vm in lookup.instances_on_host(host.id) {
        let offering = require(
            lookup.service_offering(vm.service_offering_id),
            vm.service_offering_id,
        )?;
        total = total.saturating_add(offering.cpu_capacity_mhz());
    }
    Ok(total)
}

pub fn project_host(host: &Host, lookup: &(impl Lookup + ?Sized)) -> CommandResult<HostResponse> {
    let zone = require(lookup.zone(host.zone_id), host.zone_id)?;
    let pod = host
        .pod_id
        .map(|id| require(lookup.pod(id), id))
        .transpose()?;
    let cluster = host
        .cluster_id
        .map(|id| require(lookup.cluster(id), id))
        .transpose()?;
    let os_category = lookup.guest_os_category_for_host(host.id);
    let stats = lookup.host_stats(host.id);

    let cpu_allocated =
        percent::allocated_percent(allocated_mhz(host, lookup)?, host.cpu_capacity_mhz());
    let capacity = Capacity::for_host(host, lookup);
    let (memory_total, memory_allocated, memory_used) = capacity.memory();
    let (disk_size_total, disk_size_allocated) = capacity.disk();

    Ok(HostResponse {
        id: host.id,
        name: host.name.clone(),
        state: host.status.as_str(),
        host_type: host.host_type.as_str(),
        capabilities: host.capabilities.clone(),
        ip_address: host.private_ip_address.clone(),
        hypervisor: host.hypervisor.clone(),
        version: host.version.clone(),
        zone_id: zone.id,
        zone_name: zone.name,
        pod_id: pod.as_ref().map(|p| p.id),
        pod_name: pod.map(|p| p.name),
        cluster_id: cluster.as_ref().map(|c| c.id),
        cluster_name: cluster.map(|c| c.name),
        os_category_id: os_category.as_ref().map(|c| c.id),
        os_category_name: os_category.map(|c| c.name),
        cpu_number: host.cpus,
        cpu_speed: host.speed,
        cpu_allocated,
        cpu_used: stats
            .as_ref()
            .and_then(|s| percent::utilization_percent(s.cpu_utilization)),
        average_load: stats.as_ref().map(|s| s.average_load as i64),
        network_kbs_read: stats.as_ref().map(|s| s.network_read_kbs as i64),
        network_kbs_write: stats.as_ref().map(|s| s.network_write_kbs as i64),
        memory_total,
        memory_allocated,
        memory_used,
        disk_size_total,
        disk_size_allocated,
        local_storage_active: lookup.local_storage_active(host),
        management_server_id: host.management_server_id,
        created: host.created,
        removed: host.removed,
        disconnected_on: host.disconnected_on,
        last_pinged: host.last_pinged,
        events: join_events(host.status.possible_events()),
    })
}

/// Project hosts in input order. The first enrichment failure aborts the list.
pub fn project_hosts(
    hosts: &[Host],
    lookup: &(impl Lookup + ?Sized),
) -> CommandResult<Vec<HostResponse>> {
    hosts.iter().map(|h| project_host(h, lookup)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::InMemoryLookup;
    use chrono::TimeZone;
    use nimbus_core::{
        AccountId, Cluster, CommandError, GuestOsCategory, HostStats, HostStatus, Pod,
        ServiceOffering, ServiceOfferingId, VmId, VmInstance, Zone,
    };

    fn host(host_type: HostType) -> Host {
        Host {
            id: HostId::new(1),
            name: "h1".into(),
            host_type,
            status: HostStatus::Up,
            zone_id: ZoneId::new(5),
            pod_id: Some(PodId::new(6)),
            cluster_id: None,
            hypervisor: Some("KVM".into()),
            capabilities: None,
            private_ip_address: Some("10.0.0.1".into()),
            version: Some("2.2".into()),
            cpus: 4,
            speed: 2000,
            total_memory: Some(8 * 1024 * 1024 * 1024),
            total_size: Some(500 * 1024 * 1024 * 1024),
            management_server_id: None,
            created: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            removed: None,
            disconnected_on: None,
            last_pinged: None,
        }
    }

    fn lookup() -> InMemoryLookup {
        let lookup = InMemoryLookup::new();
        lookup.put_zone(Zone {
            id: ZoneId::new(5),
            name: "zone-a".into(),
        });
        lookup.put_pod(Pod {
            id: PodId::new(6),
            name: "pod-a".into(),
            zone_id: ZoneId::new(5),
        });
        lookup.put_service_offering(ServiceOffering {
            id: ServiceOfferingId::new(1),
            name: "small".into(),
            cpu: 2,
            speed: 1000,
            ram_size: 1024,
        });
        lookup.put_instance(VmInstance {
            id: VmId::new(100),
            name: "i-100".into(),
            account_id: AccountId::new(2),
            host_id: Some(HostId::new(1)),
            service_offering_id: ServiceOfferingId::new(1),
        });
        lookup
    }

    #[test]
    fn compute_host_reports_allocated_cpu_and_memory() {
        let response = project_host(&host(HostType::Routing), &lookup()).unwrap();
        assert_eq!(response.cpu_allocated, "25%");
        assert_eq!(response.zone_name, "zone-a");
        assert_eq!(response.pod_name.as_deref(), Some("pod-a"));
        assert_eq!(response.memory_total, Some(8 * 1024 * 1024 * 1024));
        assert_eq!(response.memory_allocated, Some(1024 * 1024 * 1024));
        assert_eq!(response.memory_used, Some(1024 * 1024 * 1024));
        assert_eq!(response.disk_size_total, None);
        assert_eq!(response.disk_size_allocated, None);
    }

    #[test]
    fn unrecorded_totals_stay_absent() {
        let mut routing = host(HostType::Routing);
        routing.total_memory = None;
        let json = serde_json::to_value(project_host(&routing, &lookup()).unwrap()).unwrap();
        assert!(json.get("memorytotal").is_none());
        assert_eq!(json["memoryallocated"], 1024u64 * 1024 * 1024);
        assert_eq!(json["memoryused"], 1024u64 * 1024 * 1024);

        let mut storage = host(HostType::Storage);
        storage.total_size = None;
        let json = serde_json::to_value(project_host(&storage, &lookup()).unwrap()).unwrap();
        assert!(json.get("disksizetotal").is_none());
        assert_eq!(json["disksizeallocated"], 0);
    }

    #[test]
    fn local_storage_flag_follows_lookup() {
        let lookup = lookup();
        let before = project_host(&host(HostType::Routing), &lookup).unwrap();
        assert!(!before.local_storage_active);

        lookup.mark_local_storage_active(HostId::new(1));
        let after = project_host(&host(HostType::Routing), &lookup).unwrap();
        assert!(after.local_storage_active);
        let json = serde_json::to_value(&after).unwrap();
        assert_eq!(json["localstorageactive"], true);
    }

    #[test]
    fn host_lists_keep_input_order() {
        let hosts: Vec<Host> = [3, 1, 2]
            .into_iter()
            .map(|id| Host {
                id: HostId::new(id),
                name: format!("h{id}"),
                ..host(HostType::Routing)
            })
            .collect();
        let ids: Vec<HostId> = project_hosts(&hosts, &lookup())
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![HostId::new(3), HostId::new(1), HostId::new(2)]);
    }

    #[test]
    fn one_failing_host_aborts_the_list() {
        let good = host(HostType::Routing);
        let bad = Host {
            id: HostId::new(2),
            zone_id: ZoneId::new(99),
            ..host(HostType::Routing)
        };
        let third = Host {
            id: HostId::new(3),
            ..host(HostType::Routing)
        };
        let err = project_hosts(&[good, bad, third], &lookup()).unwrap_err();
        assert_eq!(err, CommandError::enrichment("zone", ZoneId::new(99)));
    }

    #[test]
    fn storage_host_reports_disk_fields_only() {
        let response = project_host(&host(HostType::Storage), &lookup()).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["disksizetotal"], 500u64 * 1024 * 1024 * 1024);
        assert_eq!(json["disksizeallocated"], 0);
        assert!(json.get("memorytotal").is_none());
        assert!(json.get("memoryallocated").is_none());
        assert!(json.get("memoryused").is_none());
    }

    #[test]
    fn other_host_types_report_neither_group() {
        let response = project_host(&host(HostType::ConsoleProxy), &lookup()).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("memorytotal").is_none());
        assert!(json.get("disksizetotal").is_none());
    }

    #[test]
    fn zero_capacity_host_is_unavailable() {
        let mut h = host(HostType::Routing);
        h.cpus = 0;
        let response = project_host(&h, &lookup()).unwrap();
        assert_eq!(response.cpu_allocated, percent::UNAVAILABLE);
    }

    #[test]
    fn events_join_in_declared_order() {
        assert_eq!(
            join_events(&[HostEvent::StartAgentRebalance, HostEvent::ManagementServerDown])
                .as_deref(),
            Some("StartAgentRebalance; ManagementServerDown")
        );
        assert_eq!(join_events(&[]), None);
    }

    #[test]
    fn removed_host_has_no_events_field() {
        let mut h = host(HostType::Routing);
        h.status = HostStatus::Removed;
        let json = serde_json::to_value(project_host(&h, &lookup()).unwrap()).unwrap();
        assert!(json.get("events").is_none());
    }

    #[test]
    fn live_stats_are_optional() {
        let lookup = lookup();
        let without = project_host(&host(HostType::Routing), &lookup).unwrap();
        assert_eq!(without.cpu_used, None);
        assert_eq!(without.average_load, None);

        lookup.put_host_stats(
            HostId::new(1),
            HostStats {
                cpu_utilization: 37.456,
                average_load: 2.9,
                network_read_kbs: 10.5,
                network_write_kbs: 3.0,
            },
        );
        let with = project_host(&host(HostType::Routing), &lookup).unwrap();
        assert_eq!(with.cpu_used.as_deref(), Some("37.46%"));
        assert_eq!(with.average_load, Some(2));
        assert_eq!(with.network_kbs_read, Some(10));
    }

    #[test]
    fn optional_enrichment_is_skipped_when_absent() {
        let lookup = lookup();
        let json = serde_json::to_value(project_host(&host(HostType::Routing), &lookup).unwrap())
            .unwrap();
        assert!(json.get("oscategoryid").is_none());

        lookup.put_guest_os_category(
            HostId::new(1),
            GuestOsCategory {
                id: GuestOsCategoryId::new(3),
                name: "Linux".into(),
            },
        );
        let response = project_host(&host(HostType::Routing), &lookup).unwrap();
        assert_eq!(response.os_category_name.as_deref(), Some("Linux"));
    }

    #[test]
    fn unresolved_zone_is_an_enrichment_error() {
        let mut h = host(HostType::Routing);
        h.zone_id = ZoneId::new(99);
        let err = project_host(&h, &lookup()).unwrap_err();
        assert_eq!(err, CommandError::enrichment("zone", ZoneId::new(99)));
    }

    #[test]
    fn unresolved_cluster_is_an_enrichment_error() {
        let mut h = host(HostType::Routing);
        h.cluster_id = Some(ClusterId::new(8));
        let err = project_host(&h, &lookup()).unwrap_err();
        assert_eq!(err, CommandError::enrichment("cluster", ClusterId::new(8)));

        let lookup = lookup();
        lookup.put_cluster(Cluster {
            id: ClusterId::new(8),
            name: "c-8".into(),
            pod_id: PodId::new(6),
        });
        let response = project_host(&h, &lookup).unwrap();
        assert_eq!(response.cluster_name.as_deref(), Some("c-8"));
    }

    #[test]
    fn instance_with_unknown_offering_is_an_enrichment_error() {
        let lookup = lookup();
        lookup.put_instance(VmInstance {
            id: VmId::new(101),
            name: "i-101".into(),
            account_id: AccountId::new(2),
            host_id: Some(HostId::new(1)),
            service_offering_id: ServiceOfferingId::new(42),
        });
        let err = project_host(&host(HostType::Routing), &lookup).unwrap_err();
        assert_eq!(
            err,
            CommandError::enrichment("service offering", ServiceOfferingId::new(42))
        );
    }
}
