//! Event-type catalogue recorded in the audit ledger.
//!
//! Values are part of the external audit contract; never rename one.

pub const SNAPSHOT_CREATE: &str = "SNAPSHOT.CREATE";
pub const PORT_FORWARDING_SERVICE_DELETE: &str = "PF.SERVICE.DELETE";
