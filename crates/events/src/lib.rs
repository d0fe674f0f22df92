//! `nimbus-events`: job-audit ledger contract.
//!
//! Asynchronous commands are classified and attributed before they run; the
//! resulting entries land here so every attempt stays traceable.

pub mod entry;
pub mod event_types;
pub mod in_memory_ledger;
pub mod ledger;

pub use entry::{AuditEntry, AuditLevel, AuditState, EventClass};
pub use in_memory_ledger::InMemoryAuditLedger;
pub use ledger::{AuditLedger, LedgerError, Subscription};
