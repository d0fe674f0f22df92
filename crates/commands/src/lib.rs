//! `nimbus-commands`: declarative command engine.
//!
//! A command is a static [`CommandSpec`] (parameter descriptors, target
//! operation, response naming, audit rule) plus the values bound from one
//! request. There is one engine, not one type per command.

pub mod audit;
pub mod binding;
pub mod catalog;
pub mod command;
pub mod param;

pub use audit::{AsyncCommand, AuditRule, OwnerLookup, OwnerRef, classify_rejected};
pub use binding::{BoundParams, bind};
pub use command::{Command, CommandSpec, Manager, Operation, ResultShape};
pub use param::{BoundValue, ParamDescriptor, ParamKind, RawParams, RawValue};
