//! Sequential fallback executor.
//!
//! Invoked only when the parallel executor's own control logic fails. It
//! trusts nothing the parallel path touched: hook descriptors come from the
//! backup registry file, and execution is strictly one hook at a time in
//! group-then-declaration order, stopping at the first block. Per-hook
//! semantics (exit codes, timeout kill) are the runner's, identical to the
//! fast path, so the host cannot tell which path produced its verdict.

use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use hookforge_core::{AggregateVerdict, Event, ExecutionResult, HookEvent};
use hookforge_policy::BypassState;
use hookforge_registry::Registry;
use hookforge_runner::run_hook;

use crate::filter_bypassed;

/// Replay the invocation sequentially from the backup registry.
///
/// Infallible by design: if the backup registry is also unusable, the
/// verdict is "no hooks executed, allow" — the fail-open invariant's last
/// line of defense.
pub async fn execute_fallback(
    event: &Event,
    kind: HookEvent,
    bypass: &BypassState,
    backup_path: &Path,
) -> AggregateVerdict {
    let started = Instant::now();

    let registry = match Registry::load(backup_path) {
        Ok(registry) => registry,
        Err(e) => {
            warn!(error = %e, "backup registry unusable; no hooks executed");
            return AggregateVerdict::empty();
        }
    };

    let payload = match event.to_payload() {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "event serialization failed in fallback; no hooks executed");
            return AggregateVerdict::empty();
        }
    };

    let groups = filter_bypassed(registry.hooks_for(kind, &event.tool_name), bypass);
    info!(groups = groups.len(), "fallback executor running sequentially");

    let mut results: Vec<ExecutionResult> = Vec::new();
    'groups: for group in &groups {
        for descriptor in &group.hooks {
            let result = run_hook(descriptor, &payload).await;
            let blocked = result.is_blocked();
            results.push(result);
            if blocked {
                break 'groups;
            }
        }
    }

    AggregateVerdict::from_results(results, started.elapsed().as_millis() as u64)
}
