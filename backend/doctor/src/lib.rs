//! Offline diagnostics for the hook engine.
//!
//! Never on the event-handling critical path. Exercises the registry
//! loaders, the bypass policy, and every configured hook against a
//! synthetic event, then times a full end-to-end run against the latency
//! target. Read-only with respect to the registries.

pub mod checks;
pub mod report;

pub use checks::{run_doctor, DoctorOptions};
pub use report::{DoctorReport, HookCheck, LatencyCheck, RegistryCheck};

/// Env var overriding the end-to-end latency target, in milliseconds.
pub const LATENCY_TARGET_ENV: &str = "HOOKFORGE_LATENCY_TARGET_MS";

/// Default end-to-end latency target.
pub const DEFAULT_LATENCY_TARGET_MS: u64 = 5000;

/// Resolve the latency target from the environment or the default.
pub fn latency_target_ms() -> u64 {
    std::env::var(LATENCY_TARGET_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_LATENCY_TARGET_MS)
}
