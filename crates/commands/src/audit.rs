//! Account attribution and event classification for asynchronous commands.
//!
//! Both are computed from bound (or, for rejected requests, raw) parameters
//! before the backend runs, so the ledger entry exists whatever happens next.

use nimbus_core::AccountId;
use nimbus_events::EventClass;

use crate::command::{Command, CommandSpec};
use crate::param::RawParams;

/// Rendered in descriptions when the subject parameter is absent.
const UNSPECIFIED: &str = "unspecified";

/// Kind of entity whose owner an async command is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerRef {
    Volume,
    PortForwardingService,
}

/// Read-only owner resolution used during attribution.
pub trait OwnerLookup {
    fn owner_of(&self, reference: OwnerRef, id: u64) -> Option<AccountId>;
}

/// Audit declaration of an asynchronous command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditRule {
    pub event_type: &'static str,
    /// Description prefix; the subject parameter's value is appended.
    pub description: &'static str,
    /// `LONG` parameter naming the referenced entity.
    pub subject_param: &'static str,
    pub owner: OwnerRef,
}

impl AuditRule {
    fn class(&self, subject: &str) -> EventClass {
        EventClass {
            event_type: self.event_type,
            description: format!("{}{}", self.description, subject),
        }
    }
}

/// Asynchronous view over a bound [`Command`].
#[derive(Debug, Clone, Copy)]
pub struct AsyncCommand<'a> {
    command: &'a Command,
    rule: &'a AuditRule,
}

impl<'a> AsyncCommand<'a> {
    pub(crate) fn new(command: &'a Command, rule: &'a AuditRule) -> Self {
        Self { command, rule }
    }

    pub fn command(&self) -> &'a Command {
        self.command
    }

    pub fn rule(&self) -> &'a AuditRule {
        self.rule
    }

    /// Account owning the referenced entity, or SYSTEM when the reference does
    /// not resolve. Never fails.
    pub fn attributed_account<L>(&self, lookup: &L) -> AccountId
    where
        L: OwnerLookup + ?Sized,
    {
        self.command
            .params()
            .long(self.rule.subject_param)
            .and_then(|id| u64::try_from(id).ok())
            .and_then(|id| lookup.owner_of(self.rule.owner, id))
            .unwrap_or(AccountId::SYSTEM)
    }

    /// Event type and description; a pure function of the bound parameters.
    pub fn classify(&self) -> EventClass {
        let subject = self
            .command
            .params()
            .get(self.rule.subject_param)
            .map(|v| v.to_string())
            .unwrap_or_else(|| UNSPECIFIED.to_string());
        self.rule.class(&subject)
    }
}

/// Classification for an async request that failed binding. Uses the raw
/// subject value verbatim, since it may not have coerced.
pub fn classify_rejected(spec: &CommandSpec, raw: &RawParams) -> Option<EventClass> {
    let rule = spec.audit.as_ref()?;
    let subject = raw
        .get(rule.subject_param)
        .map(|v| v.display())
        .unwrap_or_else(|| UNSPECIFIED.to_string());
    Some(rule.class(&subject))
}
