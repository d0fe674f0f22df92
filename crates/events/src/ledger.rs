//! Audit ledger abstraction (append + fan-out).
//!
//! The ledger is where asynchronous commands leave their trail. Entries are
//! appended in the order they are recorded; subscribers receive a copy of each
//! entry recorded after they subscribed.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

use thiserror::Error;

use crate::entry::AuditEntry;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("audit ledger lock poisoned")]
    Poisoned,

    #[error("audit ledger unavailable: {0}")]
    Unavailable(String),
}

/// A subscription to newly recorded audit entries.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive an entry without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }
}

/// Job-audit ledger.
///
/// `record` must be cheap and must not block on the backend operation it is
/// auditing: the dispatcher calls it before dispatch and again once the
/// outcome is known.
pub trait AuditLedger: Send + Sync {
    fn record(&self, entry: AuditEntry) -> Result<(), LedgerError>;

    fn subscribe(&self) -> Subscription<AuditEntry>;
}

impl<L> AuditLedger for Arc<L>
where
    L: AuditLedger + ?Sized,
{
    fn record(&self, entry: AuditEntry) -> Result<(), LedgerError> {
        (**self).record(entry)
    }

    fn subscribe(&self) -> Subscription<AuditEntry> {
        (**self).subscribe()
    }
}
