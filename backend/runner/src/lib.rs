//! Runs one hook as an isolated OS child process.
//!
//! Isolation by process, not thread, is deliberate: a crashing or hostile
//! hook cannot touch the orchestrator's memory. The runner never returns an
//! error for per-hook trouble; every failure mode collapses into an
//! `ExecutionResult` so a broken hook can never block unrelated work.

pub mod process;

pub use process::run_hook;
