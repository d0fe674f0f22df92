//! Infrastructure layer: lookups, backend dispatch, projection, config and
//! the command pipeline.

pub mod backend;
pub mod command_dispatcher;
pub mod config;
pub mod lookup;
pub mod projections;

pub use backend::{Backend, BackendError, RawResult};
pub use command_dispatcher::CommandDispatcher;
pub use config::{ConfigError, EngineConfig};
pub use lookup::{InMemoryLookup, Lookup, OwnerResolver};
pub use projections::{Response, ResponseBody};
