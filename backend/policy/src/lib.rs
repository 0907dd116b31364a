//! Bypass policy: which hook groups are skipped for this invocation.
//!
//! Derived fresh from the environment every invocation; each invocation is
//! a new short-lived process, so there is no caching and no staleness.

pub mod bypass;

pub use bypass::{group_flag_name, group_from_command, BypassReason, BypassState};

/// Global flag bypassing every group (developer inner loop).
pub const DEV_MODE_ENV: &str = "HOOKFORGE_DEV_MODE";
/// Global flag bypassing every group (test harnesses). Same effect as dev
/// mode; distinct name so callers stay distinguishable in diagnostics.
pub const TEST_MODE_ENV: &str = "HOOKFORGE_TEST_MODE";
/// Prefix for per-group flags, e.g. `HOOKFORGE_GROUP_PRE_BLOCKING`.
pub const GROUP_ENV_PREFIX: &str = "HOOKFORGE_GROUP_";
