//! Backend dispatch contract.
//!
//! Backend managers (host discovery, snapshot creation, security-group
//! deletion) live outside this workspace. The dispatcher only knows how to
//! hand them an [`Operation`] plus bound parameters and what shape of result
//! to expect back.

use async_trait::async_trait;
use thiserror::Error;

use nimbus_commands::{BoundParams, Operation, ResultShape};
use nimbus_core::{Host, Snapshot};

/// Raw result returned by a backend operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    Hosts(Vec<Host>),
    Snapshot(Snapshot),
    Success(bool),
}

impl RawResult {
    pub fn shape(&self) -> ResultShape {
        match self {
            RawResult::Hosts(_) => ResultShape::HostList,
            RawResult::Snapshot(_) => ResultShape::Snapshot,
            RawResult::Success(_) => ResultShape::Success,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("backend operation failed: {0}")]
    Failed(String),

    #[error("backend operation cancelled")]
    Cancelled,

    #[error("operation {manager}.{method} is not supported by this backend")]
    Unsupported {
        manager: &'static str,
        method: &'static str,
    },
}

impl BackendError {
    pub fn unsupported(operation: Operation) -> Self {
        Self::Unsupported {
            manager: operation.manager.as_str(),
            method: operation.method,
        }
    }
}

/// A backend manager facade.
///
/// `Ok(None)` means the operation ran but produced nothing; the dispatcher
/// turns that into the command's declared failure.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn invoke(
        &self,
        operation: Operation,
        params: &BoundParams,
    ) -> Result<Option<RawResult>, BackendError>;
}

#[async_trait]
impl<B> Backend for std::sync::Arc<B>
where
    B: Backend + ?Sized,
{
    async fn invoke(
        &self,
        operation: Operation,
        params: &BoundParams,
    ) -> Result<Option<RawResult>, BackendError> {
        (**self).invoke(operation, params).await
    }
}
