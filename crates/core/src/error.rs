//! Command error model.

use serde_json::json;
use thiserror::Error;

/// Result type used across the command layer.
pub type CommandResult<T> = Result<T, CommandError>;

/// API error codes carried on the wire.
pub mod codes {
    /// Malformed or missing request parameter.
    pub const PARAM_ERROR: u16 = 431;
    /// Command name not recognised.
    pub const UNSUPPORTED_ACTION: u16 = 432;
    /// Backend, projection or data-consistency failure.
    pub const INTERNAL_ERROR: u16 = 530;
    /// Caller's account may not run the command.
    pub const ACCOUNT_ERROR: u16 = 531;
}

/// Everything that can go wrong between request binding and response projection.
///
/// Binding errors are raised before any backend dispatch. The remaining
/// variants come from dispatch or projection and always carry a message that
/// can be shown to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A required parameter was absent from the request.
    #[error("missing required parameter: {name}")]
    MissingParameter { name: String },

    /// A supplied value could not be coerced to the declared kind.
    #[error("unable to parse parameter {name} as {kind}: {raw:?}")]
    TypeCoercion {
        name: String,
        kind: String,
        raw: String,
    },

    /// The backend operation failed, was cancelled, or timed out.
    #[error("execution failed: {0}")]
    Execution(String),

    /// A related entity needed to build the response could not be resolved.
    #[error("unable to resolve {entity} {id} while building the response")]
    Enrichment { entity: &'static str, id: String },

    /// The backend reported failure without raising an error.
    #[error("{0}")]
    OperationFailed(String),

    /// No command is registered under the requested name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The caller lacks the permission the command requires.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl CommandError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    pub fn coercion(name: impl Into<String>, kind: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::TypeCoercion {
            name: name.into(),
            kind: kind.into(),
            raw: raw.into(),
        }
    }

    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    pub fn enrichment(entity: &'static str, id: impl ToString) -> Self {
        Self::Enrichment {
            entity,
            id: id.to_string(),
        }
    }

    pub fn operation_failed(msg: impl Into<String>) -> Self {
        Self::OperationFailed(msg.into())
    }

    /// True for errors raised while binding, before any backend was touched.
    pub fn is_binding_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. } | Self::TypeCoercion { .. }
        )
    }

    pub fn error_code(&self) -> u16 {
        match self {
            Self::MissingParameter { .. } | Self::TypeCoercion { .. } => codes::PARAM_ERROR,
            Self::UnknownCommand(_) => codes::UNSUPPORTED_ACTION,
            Self::Unauthorized(_) => codes::ACCOUNT_ERROR,
            Self::Execution(_) | Self::Enrichment { .. } | Self::OperationFailed(_) => {
                codes::INTERNAL_ERROR
            }
        }
    }

    /// Render as `{"<response_name>": {"errorcode": .., "errortext": ..}}`.
    pub fn to_response(&self, response_name: &str) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert(
            response_name.to_string(),
            json!({
                "errorcode": self.error_code(),
                "errortext": self.to_string(),
            }),
        );
        serde_json::Value::Object(body)
    }
}
