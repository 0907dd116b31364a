//! Core types shared across the hookforge engine crates.
//!
//! Everything here is plain data: the event payload the host hands us, the
//! hook descriptors loaded from the registry, the per-hook execution results,
//! and the aggregate verdict returned to the host.

pub mod descriptor;
pub mod error;
pub mod event;
pub mod verdict;

pub use descriptor::{GroupedHooks, HookDescriptor};
pub use error::HookError;
pub use event::{EditOp, Event, HookEvent, ToolInput};
pub use verdict::{AggregateVerdict, Decision, ExecutionResult, HookOutcome};
