//! Hook execution engine: fan-out, aggregation, and the fail-safe path.
//!
//! Control flow per invocation:
//! host event → bypass filter → registry → parallel executor → verdict.
//! If the parallel executor itself fails (not an individual hook — those
//! are isolated in the runner), the whole invocation is replayed through
//! the sequential fallback executor against the backup registry. Every
//! remaining ambiguity degrades to allow.

pub mod fallback;
pub mod parallel;

use std::future::Future;
use std::path::Path;

use tracing::warn;

use hookforge_core::{AggregateVerdict, Event, GroupedHooks, HookError, HookEvent};
use hookforge_policy::BypassState;
use hookforge_registry::{backup_registry_path, primary_registry_path, Registry};

pub use fallback::execute_fallback;
pub use parallel::execute_parallel;

/// Run one host event end to end with environment-derived paths and flags.
pub async fn run_event(event: &Event, kind: HookEvent) -> AggregateVerdict {
    let bypass = BypassState::from_env();
    run_event_with(
        event,
        kind,
        &bypass,
        &primary_registry_path(),
        &backup_registry_path(),
    )
    .await
}

/// Run one host event with explicit registry paths and bypass state.
///
/// Never fails: a corrupt primary registry degrades to an empty hook set,
/// and an orchestration failure in the parallel path delegates to the
/// sequential fallback.
pub async fn run_event_with(
    event: &Event,
    kind: HookEvent,
    bypass: &BypassState,
    primary_path: &Path,
    backup_path: &Path,
) -> AggregateVerdict {
    run_event_with_executor(event, kind, bypass, primary_path, backup_path, |groups, event| async move {
        execute_parallel(&groups, &event).await
    })
    .await
}

/// As [`run_event_with`], but generic over the fast-path executor.
///
/// The seam exists so the fallback delegation can be driven directly: the
/// parallel executor only fails for orchestration-level reasons that are
/// hard to provoke on a healthy machine, yet the delegation still has to
/// hold when they happen.
pub async fn run_event_with_executor<F, Fut>(
    event: &Event,
    kind: HookEvent,
    bypass: &BypassState,
    primary_path: &Path,
    backup_path: &Path,
    executor: F,
) -> AggregateVerdict
where
    F: FnOnce(Vec<GroupedHooks>, Event) -> Fut,
    Fut: Future<Output = Result<AggregateVerdict, HookError>>,
{
    let registry = match Registry::load(primary_path) {
        Ok(registry) => registry,
        Err(e) => {
            warn!(error = %e, "primary registry unusable; running with no hooks");
            return AggregateVerdict::empty();
        }
    };

    let groups = filter_bypassed(registry.hooks_for(kind, &event.tool_name), bypass);
    if groups.is_empty() {
        return AggregateVerdict::empty();
    }

    match executor(groups, event.clone()).await {
        Ok(verdict) => verdict,
        Err(e) => {
            warn!(error = %e, "parallel executor failed; delegating to fallback");
            execute_fallback(event, kind, bypass, backup_path).await
        }
    }
}

/// Drop groups the bypass policy says to skip.
pub fn filter_bypassed(groups: Vec<GroupedHooks>, bypass: &BypassState) -> Vec<GroupedHooks> {
    groups
        .into_iter()
        .filter(|g| {
            if let Some(reason) = bypass.bypass_reason(&g.group) {
                tracing::debug!(group = %g.group, flag = %reason.flag_name(), "group bypassed");
                false
            } else {
                true
            }
        })
        .collect()
}
