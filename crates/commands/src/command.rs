use nimbus_auth::{CommandAuthorization, Permission};
use nimbus_core::{CommandError, CommandResult};

use crate::audit::{AsyncCommand, AuditRule};
use crate::binding::{BoundParams, bind};
use crate::param::{ParamDescriptor, RawParams};

/// Backend subsystem that owns an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Manager {
    /// Host discovery and agent connections.
    AgentManager,
    SnapshotManager,
    /// Catch-all management server facade (network services among others).
    ManagementServer,
}

impl Manager {
    pub fn as_str(&self) -> &'static str {
        match self {
            Manager::AgentManager => "AgentManager",
            Manager::SnapshotManager => "SnapshotManager",
            Manager::ManagementServer => "ManagementServer",
        }
    }
}

impl core::fmt::Display for Manager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The backend operation a command resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    pub manager: Manager,
    pub method: &'static str,
}

/// Shape of the result a command's backend operation returns, and therefore
/// which projection renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultShape {
    /// A list of hosts, rendered under the `host` object name.
    HostList,
    Snapshot,
    /// A bare success flag.
    Success,
}

/// Declarative description of one API command.
///
/// Specs are `static` items; the catalogue only hands out `&'static` refs.
#[derive(Debug)]
pub struct CommandSpec {
    /// API name, e.g. `addHost`.
    pub name: &'static str,
    /// Top-level response key, e.g. `addhostresponse`.
    pub response_name: &'static str,
    pub description: &'static str,
    pub operation: Operation,
    pub params: &'static [ParamDescriptor],
    pub result: ResultShape,
    /// Message surfaced when the backend reports failure by returning nothing.
    pub failure_message: &'static str,
    pub permission: Permission,
    /// Present for asynchronous commands.
    pub audit: Option<AuditRule>,
}

impl CommandSpec {
    pub fn is_async(&self) -> bool {
        self.audit.is_some()
    }

    pub fn param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.name == name)
    }

    /// First parameter name declared more than once, if any.
    pub fn duplicate_parameter(&self) -> Option<&'static str> {
        self.params.iter().enumerate().find_map(|(i, p)| {
            self.params[..i]
                .iter()
                .any(|earlier| earlier.name == p.name)
                .then_some(p.name)
        })
    }

    /// Bind a request against this spec.
    pub fn bind(&'static self, raw: &RawParams) -> CommandResult<Command> {
        let params = bind(raw, self.params)?;
        Ok(Command { spec: self, params })
    }
}

impl CommandAuthorization for CommandSpec {
    fn command_name(&self) -> &str {
        self.name
    }

    fn required_permission(&self) -> &Permission {
        &self.permission
    }
}

/// One bound request. Created per request, executed once, then dropped.
#[derive(Debug, Clone)]
pub struct Command {
    spec: &'static CommandSpec,
    params: BoundParams,
}

impl Command {
    pub fn spec(&self) -> &'static CommandSpec {
        self.spec
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn response_name(&self) -> &'static str {
        self.spec.response_name
    }

    pub fn operation(&self) -> Operation {
        self.spec.operation
    }

    pub fn params(&self) -> &BoundParams {
        &self.params
    }

    /// The asynchronous view of this command, when it has one.
    pub fn as_async(&self) -> Option<AsyncCommand<'_>> {
        self.spec
            .audit
            .as_ref()
            .map(|rule| AsyncCommand::new(self, rule))
    }

    /// Failure for a backend that returned no result.
    pub fn failure(&self) -> CommandError {
        CommandError::operation_failed(self.spec.failure_message)
    }
}
