//! Hosts managed by the agent manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ClusterId, HostId, ManagementServerId, PodId, ZoneId};

/// Host subtype. Decides which capacity fields a host reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostType {
    /// Hypervisor host running guest instances.
    Routing,
    /// Primary storage host.
    Storage,
    SecondaryStorage,
    ConsoleProxy,
    ExternalFirewall,
    ExternalLoadBalancer,
    PxeServer,
    TrafficMonitor,
}

impl HostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostType::Routing => "Routing",
            HostType::Storage => "Storage",
            HostType::SecondaryStorage => "SecondaryStorage",
            HostType::ConsoleProxy => "ConsoleProxy",
            HostType::ExternalFirewall => "ExternalFirewall",
            HostType::ExternalLoadBalancer => "ExternalLoadBalancer",
            HostType::PxeServer => "PxeServer",
            HostType::TrafficMonitor => "TrafficMonitor",
        }
    }
}

/// Events that drive host status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostEvent {
    AgentConnected,
    AgentDisconnected,
    PingTimeout,
    HostDown,
    ShutdownRequested,
    Ping,
    MaintenanceRequested,
    PreparationComplete,
    UnableToMigrate,
    ResetRequested,
    WaitedTooLong,
    Remove,
    StartAgentRebalance,
    RebalanceCompleted,
    RebalanceFailed,
    ManagementServerDown,
}

impl HostEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostEvent::AgentConnected => "AgentConnected",
            HostEvent::AgentDisconnected => "AgentDisconnected",
            HostEvent::PingTimeout => "PingTimeout",
            HostEvent::HostDown => "HostDown",
            HostEvent::ShutdownRequested => "ShutdownRequested",
            HostEvent::Ping => "Ping",
            HostEvent::MaintenanceRequested => "MaintenanceRequested",
            HostEvent::PreparationComplete => "PreparationComplete",
            HostEvent::UnableToMigrate => "UnableToMigrate",
            HostEvent::ResetRequested => "ResetRequested",
            HostEvent::WaitedTooLong => "WaitedTooLong",
            HostEvent::Remove => "Remove",
            HostEvent::StartAgentRebalance => "StartAgentRebalance",
            HostEvent::RebalanceCompleted => "RebalanceCompleted",
            HostEvent::RebalanceFailed => "RebalanceFailed",
            HostEvent::ManagementServerDown => "ManagementServerDown",
        }
    }
}

impl core::fmt::Display for HostEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection status of a host agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostStatus {
    Creating,
    Connecting,
    Up,
    Down,
    Disconnected,
    Alert,
    PrepareForMaintenance,
    ErrorInMaintenance,
    Maintenance,
    Rebalancing,
    Removed,
}

impl HostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostStatus::Creating => "Creating",
            HostStatus::Connecting => "Connecting",
            HostStatus::Up => "Up",
            HostStatus::Down => "Down",
            HostStatus::Disconnected => "Disconnected",
            HostStatus::Alert => "Alert",
            HostStatus::PrepareForMaintenance => "PrepareForMaintenance",
            HostStatus::ErrorInMaintenance => "ErrorInMaintenance",
            HostStatus::Maintenance => "Maintenance",
            HostStatus::Rebalancing => "Rebalancing",
            HostStatus::Removed => "Removed",
        }
    }

    /// Events accepted in this status, in transition-table order.
    pub fn possible_events(&self) -> &'static [HostEvent] {
        use HostEvent::*;
        match self {
            HostStatus::Creating => &[AgentConnected, Remove],
            HostStatus::Connecting => &[
                AgentConnected,
                AgentDisconnected,
                PingTimeout,
                StartAgentRebalance,
                ManagementServerDown,
                Remove,
            ],
            HostStatus::Up => &[
                Ping,
                AgentDisconnected,
                PingTimeout,
                HostDown,
                ShutdownRequested,
                MaintenanceRequested,
                StartAgentRebalance,
                ManagementServerDown,
            ],
            HostStatus::Down => &[AgentConnected, MaintenanceRequested, Remove],
            HostStatus::Disconnected => &[
                AgentConnected,
                PingTimeout,
                HostDown,
                WaitedTooLong,
                MaintenanceRequested,
                Remove,
            ],
            HostStatus::Alert => &[AgentConnected, Ping, MaintenanceRequested, Remove],
            HostStatus::PrepareForMaintenance => &[
                PreparationComplete,
                UnableToMigrate,
                ResetRequested,
                AgentDisconnected,
            ],
            HostStatus::ErrorInMaintenance => &[ResetRequested, PreparationComplete],
            HostStatus::Maintenance => &[ResetRequested, Remove],
            HostStatus::Rebalancing => &[RebalanceCompleted, RebalanceFailed],
            HostStatus::Removed => &[],
        }
    }
}

/// Live statistics reported by the host agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostStats {
    /// CPU utilization in percent (0..=100).
    pub cpu_utilization: f64,
    pub average_load: f64,
    pub network_read_kbs: f64,
    pub network_write_kbs: f64,
}

/// A host as returned by host discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: HostId,
    pub name: String,
    pub host_type: HostType,
    pub status: HostStatus,
    pub zone_id: ZoneId,
    pub pod_id: Option<PodId>,
    pub cluster_id: Option<ClusterId>,
    pub hypervisor: Option<String>,
    pub capabilities: Option<String>,
    pub private_ip_address: Option<String>,
    pub version: Option<String>,
    /// Declared CPU count.
    pub cpus: u32,
    /// Per-CPU speed in MHz.
    pub speed: u32,
    /// Memory in bytes; set for hypervisor hosts.
    pub total_memory: Option<u64>,
    /// Storage capacity in bytes; set for storage hosts.
    pub total_size: Option<u64>,
    pub management_server_id: Option<ManagementServerId>,
    pub created: DateTime<Utc>,
    pub removed: Option<DateTime<Utc>>,
    pub disconnected_on: Option<DateTime<Utc>>,
    pub last_pinged: Option<DateTime<Utc>>,
}

impl Host {
    /// Total declared MHz, `cpus * speed`.
    pub fn cpu_capacity_mhz(&self) -> u64 {
        u64::from(self.cpus) * u64::from(self.speed)
    }
}
