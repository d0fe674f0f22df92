//! In-memory audit ledger for tests/dev.

use std::sync::{Mutex, mpsc};

use nimbus_core::AccountId;

use crate::entry::AuditEntry;
use crate::ledger::{AuditLedger, LedgerError, Subscription};

/// Append-only in-memory ledger with best-effort fan-out.
#[derive(Debug, Default)]
pub struct InMemoryAuditLedger {
    entries: Mutex<Vec<AuditEntry>>,
    subscribers: Mutex<Vec<mpsc::Sender<AuditEntry>>>,
}

impl InMemoryAuditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry recorded so far, in record order.
    pub fn entries(&self) -> Vec<AuditEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(_) => vec![],
        }
    }

    pub fn entries_for_account(&self, account_id: AccountId) -> Vec<AuditEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.account_id() == account_id)
            .collect()
    }
}

impl AuditLedger for InMemoryAuditLedger {
    fn record(&self, entry: AuditEntry) -> Result<(), LedgerError> {
        {
            let mut entries = self.entries.lock().map_err(|_| LedgerError::Poisoned)?;
            entries.push(entry.clone());
        }

        let mut subs = self.subscribers.lock().map_err(|_| LedgerError::Poisoned)?;
        // Drop any dead subscribers while fanning out.
        subs.retain(|tx| tx.send(entry.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription<AuditEntry> {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        Subscription::new(rx)
    }
}
