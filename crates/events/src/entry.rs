use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nimbus_core::AccountId;

/// What an asynchronous command is about to attempt, independent of outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EventClass {
    pub event_type: &'static str,
    pub description: String,
}

/// Lifecycle position of an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditState {
    /// Recorded before the backend operation runs.
    Started,
    Completed,
    /// The request was rejected or the operation failed.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditLevel {
    Info,
    Error,
}

/// One row in the job-audit ledger.
///
/// Notes:
/// - `account_id` is resolved before dispatch; unresolvable references are
///   attributed to [`AccountId::SYSTEM`].
/// - `correlation_id` ties the `Started` entry to its terminal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    entry_id: Uuid,
    correlation_id: Uuid,
    command: String,
    account_id: AccountId,
    event_type: String,
    description: String,
    state: AuditState,
    level: AuditLevel,
    detail: Option<String>,
    occurred_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn started(
        correlation_id: Uuid,
        command: impl Into<String>,
        account_id: AccountId,
        class: &EventClass,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::build(
            correlation_id,
            command.into(),
            account_id,
            class,
            AuditState::Started,
            None,
            occurred_at,
        )
    }

    pub fn completed(
        correlation_id: Uuid,
        command: impl Into<String>,
        account_id: AccountId,
        class: &EventClass,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::build(
            correlation_id,
            command.into(),
            account_id,
            class,
            AuditState::Completed,
            None,
            occurred_at,
        )
    }

    pub fn failed(
        correlation_id: Uuid,
        command: impl Into<String>,
        account_id: AccountId,
        class: &EventClass,
        reason: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::build(
            correlation_id,
            command.into(),
            account_id,
            class,
            AuditState::Failed,
            Some(reason.into()),
            occurred_at,
        )
    }

    fn build(
        correlation_id: Uuid,
        command: String,
        account_id: AccountId,
        class: &EventClass,
        state: AuditState,
        detail: Option<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        let level = match state {
            AuditState::Failed => AuditLevel::Error,
            AuditState::Started | AuditState::Completed => AuditLevel::Info,
        };
        Self {
            entry_id: Uuid::now_v7(),
            correlation_id,
            command,
            account_id,
            event_type: class.event_type.to_string(),
            description: class.description.clone(),
            state,
            level,
            detail,
            occurred_at,
        }
    }

    pub fn entry_id(&self) -> Uuid {
        self.entry_id
    }

    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state(&self) -> AuditState {
        self.state
    }

    pub fn level(&self) -> AuditLevel {
        self.level
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
