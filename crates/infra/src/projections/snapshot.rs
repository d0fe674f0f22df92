use chrono::{DateTime, Utc};
use serde::Serialize;

use nimbus_core::{CommandResult, DomainId, Snapshot, SnapshotId, VolumeId};

use crate::lookup::{Lookup, require};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotResponse {
    pub id: SnapshotId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(rename = "domainid", skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<DomainId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(rename = "snapshottype")]
    pub snapshot_type: &'static str,
    #[serde(rename = "volumeid")]
    pub volume_id: VolumeId,
    #[serde(rename = "volumename")]
    pub volume_name: String,
    #[serde(rename = "volumetype")]
    pub volume_type: &'static str,
    pub created: DateTime<Utc>,
    pub name: String,
}

/// The owning account is optional; once it resolves, its domain must too.
/// The snapshot's volume is always required.
pub fn project_snapshot(
    snapshot: &Snapshot,
    lookup: &(impl Lookup + ?Sized),
) -> CommandResult<SnapshotResponse> {
    let (account, domain_id, domain) = match lookup.account(snapshot.account_id) {
        Some(account) => {
            let domain = require(lookup.domain(account.domain_id), account.domain_id)?;
            (Some(account.account_name), Some(domain.id), Some(domain.name))
        }
        None => (None, None, None),
    };
    let volume = require(lookup.volume(snapshot.volume_id), snapshot.volume_id)?;

    Ok(SnapshotResponse {
        id: snapshot.id,
        account,
        domain_id,
        domain,
        snapshot_type: snapshot.snapshot_type.as_str(),
        volume_id: volume.id,
        volume_name: volume.name,
        volume_type: volume.volume_type.as_str(),
        created: snapshot.created,
        name: snapshot.name.clone(),
    })
}
