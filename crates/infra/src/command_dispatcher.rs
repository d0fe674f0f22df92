//! Command execution pipeline.
//!
//! ```text
//! name + raw parameters
//!   ↓
//! 1. Resolve the command spec (unknown → UnknownCommand)
//!   ↓
//! 2. Authorize the principal against the command's permission
//!   ↓
//! 3. Bind raw parameters against the descriptors
//!   ↓
//! 4. Async only: attribute, classify, record `Started`
//!   ↓
//! 5. Invoke the backend operation (bounded by the dispatch timeout)
//!   ↓
//! 6. Project the raw result
//!   ↓
//! 7. Async only: record `Completed` or `Failed`
//! ```
//!
//! A dispatch future dropped between steps 4 and 7 records `Failed` with
//! detail `cancelled`.
//!
//! Rejections at steps 2 and 3 for asynchronous commands leave a single
//! `Failed` entry attributed to SYSTEM, since no bound reference exists to
//! attribute against.

use chrono::Utc;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use nimbus_auth::{Principal, authorize};
use nimbus_commands::{Command, CommandSpec, RawParams, catalog, classify_rejected};
use nimbus_core::{AccountId, CommandError, CommandResult};
use nimbus_events::{AuditEntry, AuditLedger, EventClass};

use crate::backend::Backend;
use crate::config::EngineConfig;
use crate::lookup::{Lookup, OwnerResolver};
use crate::projections::{Response, project};

/// Audit context of one in-flight asynchronous command.
///
/// Once armed, a trail dropped without [`AuditTrail::finish`] records
/// `Failed` with detail `cancelled`, so a dispatch future dropped mid-await
/// never leaves a lone `Started` entry.
struct AuditTrail<'a, A: AuditLedger> {
    ledger: &'a A,
    correlation_id: Uuid,
    command: &'static str,
    account_id: AccountId,
    class: EventClass,
    armed: bool,
}

impl<A: AuditLedger> AuditTrail<'_, A> {
    fn started(&self) -> AuditEntry {
        AuditEntry::started(
            self.correlation_id,
            self.command,
            self.account_id,
            &self.class,
            Utc::now(),
        )
    }

    fn finish(mut self, outcome: &CommandResult<Response>) {
        self.armed = false;
        let entry = match outcome {
            Ok(_) => AuditEntry::completed(
                self.correlation_id,
                self.command,
                self.account_id,
                &self.class,
                Utc::now(),
            ),
            Err(err) => AuditEntry::failed(
                self.correlation_id,
                self.command,
                self.account_id,
                &self.class,
                err.to_string(),
                Utc::now(),
            ),
        };
        record_terminal(self.ledger, entry);
    }
}

impl<A: AuditLedger> Drop for AuditTrail<'_, A> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!(
            correlation_id = %self.correlation_id,
            command = self.command,
            "dispatch dropped before completion"
        );
        record_terminal(
            self.ledger,
            AuditEntry::failed(
                self.correlation_id,
                self.command,
                self.account_id,
                &self.class,
                CANCELLED,
                Utc::now(),
            ),
        );
    }
}

const CANCELLED: &str = "cancelled";

fn record_terminal<A: AuditLedger>(ledger: &A, entry: AuditEntry) {
    if let Err(e) = ledger.record(entry) {
        error!(error = %e, "audit ledger rejected terminal entry");
    }
}

/// Runs commands end to end against a lookup service, a backend and an
/// audit ledger.
///
/// The dispatcher holds no per-request state; one instance serves concurrent
/// requests as long as its collaborators do.
#[derive(Debug)]
pub struct CommandDispatcher<L, B, A> {
    lookup: L,
    backend: B,
    ledger: A,
    config: EngineConfig,
}

impl<L, B, A> CommandDispatcher<L, B, A> {
    pub fn new(lookup: L, backend: B, ledger: A, config: EngineConfig) -> Self {
        Self {
            lookup,
            backend,
            ledger,
            config,
        }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn ledger(&self) -> &A {
        &self.ledger
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn into_parts(self) -> (L, B, A) {
        (self.lookup, self.backend, self.ledger)
    }
}

impl<L, B, A> CommandDispatcher<L, B, A>
where
    L: Lookup,
    B: Backend,
    A: AuditLedger,
{
    /// Resolve, authorize, bind and execute the command named `name`.
    pub async fn dispatch(
        &self,
        principal: &Principal,
        name: &str,
        raw: &RawParams,
    ) -> CommandResult<Response> {
        let spec = catalog::find(name).ok_or_else(|| {
            warn!(command = name, "unknown command");
            CommandError::UnknownCommand(name.to_string())
        })?;

        let span = info_span!(
            "command",
            command = spec.name,
            response = spec.response_name,
            caller = %principal.account_id,
        );

        async move {
            if let Err(e) = authorize(principal, spec) {
                warn!(error = %e, "authorization rejected");
                let err = CommandError::Unauthorized(e.to_string());
                self.record_rejected(spec, raw, &err);
                return Err(err);
            }

            let command = match spec.bind(raw) {
                Ok(command) => command,
                Err(err) => {
                    warn!(error = %err, "binding rejected");
                    self.record_rejected(spec, raw, &err);
                    return Err(err);
                }
            };
            debug!(params = ?command.params(), "bound");

            self.execute(&command).await
        }
        .instrument(span)
        .await
    }

    /// Execute an already authorized and bound command.
    pub async fn execute(&self, command: &Command) -> CommandResult<Response> {
        let trail = match command.as_async() {
            Some(async_cmd) => {
                let mut trail = AuditTrail {
                    ledger: &self.ledger,
                    correlation_id: Uuid::now_v7(),
                    command: command.name(),
                    account_id: async_cmd.attributed_account(&OwnerResolver(&self.lookup)),
                    class: async_cmd.classify(),
                    armed: false,
                };
                self.record_started(&trail)?;
                trail.armed = true;
                Some(trail)
            }
            None => None,
        };

        let outcome = self.invoke_and_project(command).await;

        if let Some(trail) = trail {
            trail.finish(&outcome);
        }

        match &outcome {
            Ok(_) => info!(command = command.name(), "completed"),
            Err(err) => error!(command = command.name(), error = %err, "failed"),
        }
        outcome
    }

    async fn invoke_and_project(&self, command: &Command) -> CommandResult<Response> {
        let operation = command.operation();
        let invocation = self.backend.invoke(operation, command.params());

        let raw = match tokio::time::timeout(self.config.dispatch_timeout, invocation).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => return Err(CommandError::execution(e.to_string())),
            Err(_) => {
                return Err(CommandError::execution(format!(
                    "{}.{} timed out after {:?}",
                    operation.manager, operation.method, self.config.dispatch_timeout
                )));
            }
        };

        project(command, raw.as_ref(), &self.lookup)
    }

    fn record_started(&self, trail: &AuditTrail<'_, A>) -> CommandResult<()> {
        let entry = trail.started();
        debug!(
            correlation_id = %trail.correlation_id,
            account = %trail.account_id,
            event_type = trail.class.event_type,
            "recording started"
        );

        match self.ledger.record(entry) {
            Ok(()) => Ok(()),
            Err(e) if self.config.strict_audit => {
                error!(error = %e, "audit ledger rejected started entry, aborting");
                Err(CommandError::execution(format!("audit ledger unavailable: {e}")))
            }
            Err(e) => {
                warn!(error = %e, "audit ledger rejected started entry, continuing");
                Ok(())
            }
        }
    }

    fn record_rejected(&self, spec: &CommandSpec, raw: &RawParams, err: &CommandError) {
        let Some(class) = classify_rejected(spec, raw) else {
            return;
        };
        let entry = AuditEntry::failed(
            Uuid::now_v7(),
            spec.name,
            AccountId::SYSTEM,
            &class,
            err.to_string(),
            Utc::now(),
        );
        if let Err(e) = self.ledger.record(entry) {
            warn!(error = %e, "audit ledger rejected entry for rejected request");
        }
    }
}
