//! Command catalogue.
//!
//! Every API command is a static descriptor table. The name index is built
//! once per process and is read-only afterwards.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use nimbus_auth::permissions::catalog as perms;
use nimbus_events::event_types;

use crate::audit::{AuditRule, OwnerRef};
use crate::command::{CommandSpec, Manager, Operation, ResultShape};
use crate::param::{ParamDescriptor, ParamKind};

pub static ADD_HOST: CommandSpec = CommandSpec {
    name: "addHost",
    response_name: "addhostresponse",
    description: "Adds a new host.",
    operation: Operation {
        manager: Manager::AgentManager,
        method: "discoverHosts",
    },
    params: &[
        ParamDescriptor::optional("clusterid", ParamKind::Long, "the cluster ID for the host"),
        ParamDescriptor::optional("clustername", ParamKind::String, "the cluster name for the host"),
        ParamDescriptor::required("password", ParamKind::String, "the password for the host")
            .sensitive(),
        ParamDescriptor::optional("podid", ParamKind::Long, "the Pod ID for the host"),
        ParamDescriptor::required("url", ParamKind::String, "the host URL"),
        ParamDescriptor::required("username", ParamKind::String, "the username for the host"),
        ParamDescriptor::required("zoneid", ParamKind::Long, "the Zone ID for the host"),
    ],
    result: ResultShape::HostList,
    failure_message: "Failed to add host",
    permission: perms::HOST_ADD,
    audit: None,
};

pub static CREATE_SNAPSHOT: CommandSpec = CommandSpec {
    name: "createSnapshotInternal",
    response_name: "createsnapshotresponse",
    description: "Creates an instant snapshot of a volume.",
    operation: Operation {
        manager: Manager::SnapshotManager,
        method: "createSnapshotInternal",
    },
    params: &[
        ParamDescriptor::optional("policyid", ParamKind::Long, "the snapshot policy ID"),
        ParamDescriptor::required("volumeid", ParamKind::Long, "the ID of the volume to snapshot"),
    ],
    result: ResultShape::Snapshot,
    failure_message: "Failed to create snapshot",
    permission: perms::SNAPSHOT_CREATE,
    audit: Some(AuditRule {
        event_type: event_types::SNAPSHOT_CREATE,
        description: "creating snapshot for volume: ",
        subject_param: "volumeid",
        owner: OwnerRef::Volume,
    }),
};

pub static DELETE_PORT_FORWARDING_SERVICE: CommandSpec = CommandSpec {
    name: "deletePortForwardingService",
    response_name: "deleteportforwardingserviceresponse",
    description: "Deletes a port forwarding service",
    operation: Operation {
        manager: Manager::ManagementServer,
        method: "deleteSecurityGroup",
    },
    params: &[ParamDescriptor::required(
        "id",
        ParamKind::Long,
        "ID of the port forwarding service",
    )],
    result: ResultShape::Success,
    failure_message: "Failed to delete port forwarding service",
    permission: perms::PORT_FORWARDING_SERVICE_DELETE,
    audit: Some(AuditRule {
        event_type: event_types::PORT_FORWARDING_SERVICE_DELETE,
        description: "deleting port forwarding service: ",
        subject_param: "id",
        owner: OwnerRef::PortForwardingService,
    }),
};

static ALL: &[&CommandSpec] = &[&ADD_HOST, &CREATE_SNAPSHOT, &DELETE_PORT_FORWARDING_SERVICE];

static BY_NAME: LazyLock<BTreeMap<&'static str, &'static CommandSpec>> =
    LazyLock::new(|| ALL.iter().map(|spec| (spec.name, *spec)).collect());

/// Look up a command by API name (exact match).
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    BY_NAME.get(name).copied()
}

pub fn all() -> impl Iterator<Item = &'static CommandSpec> {
    ALL.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::RawParams;
    use nimbus_core::CommandError;
    use std::collections::HashSet;

    #[test]
    fn parameter_names_are_unique_per_command() {
        for spec in all() {
            assert_eq!(spec.duplicate_parameter(), None, "{}", spec.name);
        }
    }

    #[test]
    fn names_and_response_keys_are_unique() {
        let names: HashSet<_> = all().map(|s| s.name).collect();
        let responses: HashSet<_> = all().map(|s| s.response_name).collect();
        assert_eq!(names.len(), ALL.len());
        assert_eq!(responses.len(), ALL.len());
    }

    #[test]
    fn subject_parameters_are_required_longs() {
        for spec in all() {
            if let Some(rule) = &spec.audit {
                let param = spec.param(rule.subject_param).unwrap();
                assert!(param.required, "{}", spec.name);
                assert_eq!(param.kind, ParamKind::Long, "{}", spec.name);
            }
        }
    }

    #[test]
    fn find_resolves_declared_names() {
        assert_eq!(find("addHost").unwrap().response_name, "addhostresponse");
        assert!(find("addhost").is_none());
        assert!(find("rebootRouter").is_none());
    }

    #[test]
    fn add_host_binds_documented_request() {
        let raw = RawParams::new()
            .with("password", "p")
            .with("url", "http://h")
            .with("username", "u")
            .with("zoneid", "5");
        let cmd = ADD_HOST.bind(&raw).unwrap();
        assert_eq!(cmd.params().long("zoneid"), Some(5));
        assert_eq!(cmd.operation().manager, Manager::AgentManager);
        assert_eq!(cmd.operation().method, "discoverHosts");
    }

    #[test]
    fn add_host_without_url_is_rejected() {
        let raw = RawParams::new()
            .with("password", "p")
            .with("username", "u")
            .with("zoneid", "5");
        assert_eq!(ADD_HOST.bind(&raw).unwrap_err(), CommandError::missing("url"));
    }

    #[test]
    fn async_flags_follow_audit_rules() {
        assert!(!ADD_HOST.is_async());
        assert!(CREATE_SNAPSHOT.is_async());
        assert!(DELETE_PORT_FORWARDING_SERVICE.is_async());
    }
}
