//! Response envelopes.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use super::host::HostResponse;
use super::snapshot::SnapshotResponse;
use super::success::SuccessResponse;

/// Projected body of a command response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Hosts(Vec<HostResponse>),
    Snapshot(SnapshotResponse),
    Success(SuccessResponse),
}

#[derive(Debug, Serialize)]
struct HostList<'a> {
    count: usize,
    #[serde(rename = "host")]
    hosts: &'a [HostResponse],
}

/// A projected response keyed by the command's response name.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub response_name: &'static str,
    pub body: ResponseBody,
}

impl Response {
    pub fn new(response_name: &'static str, body: ResponseBody) -> Self {
        Self {
            response_name,
            body,
        }
    }

    /// `{"<responsename>": <body>}`.
    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        let body = match &self.body {
            ResponseBody::Hosts(hosts) => serde_json::to_value(HostList {
                count: hosts.len(),
                hosts,
            })?,
            ResponseBody::Snapshot(snapshot) => serde_json::to_value(snapshot)?,
            ResponseBody::Success(success) => serde_json::to_value(success)?,
        };
        let mut envelope = Map::new();
        envelope.insert(self.response_name.to_string(), body);
        Ok(JsonValue::Object(envelope))
    }
}
