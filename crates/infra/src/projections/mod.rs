//! Response projection.
//!
//! Pure functions from a raw backend result plus read-only lookups to a
//! client-facing [`Response`]. Projection performs no writes and carries no
//! state between calls, so the same input and lookup snapshot always yield
//! the same response.

pub mod host;
pub mod percent;
pub mod response;
pub mod snapshot;
pub mod success;

pub use host::{HostResponse, join_events, project_host, project_hosts};
pub use response::{Response, ResponseBody};
pub use snapshot::{SnapshotResponse, project_snapshot};
pub use success::{SuccessResponse, project_success};

use nimbus_commands::{Command, ResultShape};
use nimbus_core::{CommandError, CommandResult};

use crate::backend::RawResult;
use crate::lookup::Lookup;

/// Project `raw` for `command`.
///
/// A missing result is the command's declared failure. A result whose shape
/// does not match what the command declares is an execution error.
pub fn project(
    command: &Command,
    raw: Option<&RawResult>,
    lookup: &(impl Lookup + ?Sized),
) -> CommandResult<Response> {
    let raw = raw.ok_or_else(|| command.failure())?;
    let expected = command.spec().result;

    let body = match (expected, raw) {
        (ResultShape::HostList, RawResult::Hosts(hosts)) => {
            ResponseBody::Hosts(project_hosts(hosts, lookup)?)
        }
        (ResultShape::Snapshot, RawResult::Snapshot(snapshot)) => {
            ResponseBody::Snapshot(project_snapshot(snapshot, lookup)?)
        }
        (ResultShape::Success, RawResult::Success(success)) => {
            ResponseBody::Success(project_success(*success))
        }
        (expected, other) => {
            return Err(CommandError::execution(format!(
                "{} expected a {:?} result, backend returned {:?}",
                command.name(),
                expected,
                other.shape()
            )));
        }
    };

    Ok(Response::new(command.response_name(), body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::InMemoryLookup;
    use chrono::{TimeZone, Utc};
    use nimbus_commands::{RawParams, catalog};
    use nimbus_core::{
        AccountId, Host, HostId, HostStatus, HostType, ServiceOffering, ServiceOfferingId, VmId,
        VmInstance, Zone, ZoneId,
    };
    use proptest::prelude::*;

    fn delete_command() -> Command {
        catalog::DELETE_PORT_FORWARDING_SERVICE
            .bind(&RawParams::new().with("id", "12"))
            .unwrap()
    }

    #[test]
    fn missing_result_is_the_declared_failure() {
        let err = project(&delete_command(), None, &InMemoryLookup::new()).unwrap_err();
        assert_eq!(
            err,
            CommandError::operation_failed("Failed to delete port forwarding service")
        );
    }

    #[test]
    fn false_success_is_still_rendered() {
        let response = project(
            &delete_command(),
            Some(&RawResult::Success(false)),
            &InMemoryLookup::new(),
        )
        .unwrap();
        assert_eq!(
            response.body,
            ResponseBody::Success(SuccessResponse { success: false })
        );
        assert_eq!(response.response_name, "deleteportforwardingserviceresponse");
    }

    #[test]
    fn mismatched_shape_is_an_execution_error() {
        let err = project(
            &delete_command(),
            Some(&RawResult::Hosts(vec![])),
            &InMemoryLookup::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::Execution(_)));
    }

    fn add_host_command() -> Command {
        catalog::ADD_HOST
            .bind(
                &RawParams::new()
                    .with("password", "p")
                    .with("url", "http://h")
                    .with("username", "u")
                    .with("zoneid", "5"),
            )
            .unwrap()
    }

    prop_compose! {
        fn arb_host()(
            id in 1u64..1000,
            cpus in 0u32..64,
            speed in 0u32..4000,
            host_type in prop_oneof![
                Just(HostType::Routing),
                Just(HostType::Storage),
                Just(HostType::SecondaryStorage),
            ],
            status in prop_oneof![
                Just(HostStatus::Up),
                Just(HostStatus::Connecting),
                Just(HostStatus::Removed),
            ],
            total_memory in proptest::option::of(0u64..1 << 40),
        ) -> Host {
            Host {
                id: HostId::new(id),
                name: format!("host-{id}"),
                host_type,
                status,
                zone_id: ZoneId::new(5),
                pod_id: None,
                cluster_id: None,
                hypervisor: None,
                capabilities: None,
                private_ip_address: None,
                version: None,
                cpus,
                speed,
                total_memory,
                total_size: Some(1 << 30),
                management_server_id: None,
                created: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                removed: None,
                disconnected_on: None,
                last_pinged: None,
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: projecting the same result against the same lookup twice
        /// yields byte-identical JSON.
        #[test]
        fn host_projection_is_idempotent(
            hosts in proptest::collection::vec(arb_host(), 0..5),
            vms in 0u64..4,
        ) {
            let lookup = InMemoryLookup::new();
            lookup.put_zone(Zone { id: ZoneId::new(5), name: "z".into() });
            lookup.put_service_offering(ServiceOffering {
                id: ServiceOfferingId::new(1),
                name: "small".into(),
                cpu: 1,
                speed: 500,
                ram_size: 256,
            });
            for (i, host) in hosts.iter().enumerate() {
                for n in 0..vms {
                    lookup.put_instance(VmInstance {
                        id: VmId::new(i as u64 * 10 + n + 1),
                        name: format!("i-{i}-{n}"),
                        account_id: AccountId::new(2),
                        host_id: Some(host.id),
                        service_offering_id: ServiceOfferingId::new(1),
                    });
                }
            }

            let command = add_host_command();
            let raw = RawResult::Hosts(hosts);
            let first = project(&command, Some(&raw), &lookup).unwrap().to_json().unwrap();
            let second = project(&command, Some(&raw), &lookup).unwrap().to_json().unwrap();
            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }
    }
}
