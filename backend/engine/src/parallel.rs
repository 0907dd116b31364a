//! Parallel executor: concurrent fan-out within a group, strict ordering
//! across groups.
//!
//! All hooks of one priority group run concurrently as independent OS
//! children; the next group starts only once every result in the current
//! group is known. A block short-circuits later groups (they are never
//! spawned), but in-flight siblings in the same group are always awaited —
//! never killed because of another hook's verdict — so auto-fix style
//! hooks can finish their writes.

use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{debug, info};

use hookforge_core::{
    AggregateVerdict, Event, ExecutionResult, GroupedHooks, HookError,
};
use hookforge_runner::run_hook;

/// Execute all groups against the event and aggregate a verdict.
///
/// Only orchestration-level failures (payload serialization, a panicked
/// worker task) surface as `Err`; they are the trigger for the fallback
/// executor. Individual hook failures are already data by the time they
/// leave the runner.
pub async fn execute_parallel(
    groups: &[GroupedHooks],
    event: &Event,
) -> Result<AggregateVerdict, HookError> {
    let started = Instant::now();
    let payload = event
        .to_payload()
        .map_err(|e| HookError::Orchestration(format!("event serialization failed: {e}")))?;

    let mut results: Vec<ExecutionResult> = Vec::new();

    for group in groups {
        debug!(group = %group.group, hooks = group.hooks.len(), "starting hook group");
        let group_results = run_group(group, &payload).await?;
        let blocked = group_results.iter().any(ExecutionResult::is_blocked);
        results.extend(group_results);
        if blocked {
            // Later groups are never started; the expensive work they
            // represent is the whole point of priority ordering.
            info!(group = %group.group, "group produced a block; skipping later groups");
            break;
        }
    }

    let verdict = AggregateVerdict::from_results(results, started.elapsed().as_millis() as u64);
    Ok(verdict)
}

/// Run every hook of one group concurrently, returning results in
/// declaration order regardless of completion order.
async fn run_group(
    group: &GroupedHooks,
    payload: &str,
) -> Result<Vec<ExecutionResult>, HookError> {
    let mut set = JoinSet::new();
    for (index, descriptor) in group.hooks.iter().enumerate() {
        let descriptor = descriptor.clone();
        let payload = payload.to_owned();
        set.spawn(async move { (index, run_hook(&descriptor, &payload).await) });
    }

    let mut slots: Vec<Option<ExecutionResult>> = vec![None; group.hooks.len()];
    while let Some(joined) = set.join_next().await {
        let (index, result) = joined.map_err(|e| {
            HookError::Orchestration(format!("hook worker task failed: {e}"))
        })?;
        slots[index] = Some(result);
    }

    Ok(slots.into_iter().flatten().collect())
}
