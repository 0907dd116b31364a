//! Per-hook execution results and the aggregate verdict.
//!
//! The verdict fold lives here so the parallel and fallback executors share
//! one deterministic first-block-wins rule: for the same ordered result list
//! both paths produce the same `AggregateVerdict`.

use serde::{Deserialize, Serialize};

/// Outcome of running one hook to completion (or failing to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookOutcome {
    /// Exit code 0.
    Allowed,
    /// Exit code 2; stderr carries the human-readable reason.
    Blocked,
    /// Any other exit code, or a spawn/runtime failure. Counts as allow.
    Errored,
    /// Killed after exceeding its timeout. Counts as allow.
    TimedOut,
}

/// Record of one hook invocation. Created exactly once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub hook_command: String,
    pub outcome: HookOutcome,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

impl ExecutionResult {
    pub fn is_blocked(&self) -> bool {
        self.outcome == HookOutcome::Blocked
    }
}

/// Final decision reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Block,
}

/// The single output of one engine invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateVerdict {
    pub decision: Decision,
    pub blocking_hook: Option<String>,
    pub blocking_message: Option<String>,
    pub results: Vec<ExecutionResult>,
    pub total_duration_ms: u64,
}

impl AggregateVerdict {
    /// Verdict for an invocation in which no hooks ran at all.
    pub fn empty() -> Self {
        Self {
            decision: Decision::Allow,
            blocking_hook: None,
            blocking_message: None,
            results: Vec::new(),
            total_duration_ms: 0,
        }
    }

    /// Fold an ordered result list into a verdict.
    ///
    /// `results` must already be in group-then-declaration order; the first
    /// blocked entry wins. Every non-blocked outcome is informational.
    pub fn from_results(results: Vec<ExecutionResult>, total_duration_ms: u64) -> Self {
        let first_block = results.iter().find(|r| r.is_blocked());
        match first_block {
            Some(blocked) => Self {
                decision: Decision::Block,
                blocking_hook: Some(blocked.hook_command.clone()),
                blocking_message: Some(blocked.stderr.clone()),
                results: results.clone(),
                total_duration_ms,
            },
            None => Self {
                decision: Decision::Allow,
                blocking_hook: None,
                blocking_message: None,
                results,
                total_duration_ms,
            },
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.decision == Decision::Block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(command: &str, outcome: HookOutcome, stderr: &str) -> ExecutionResult {
        ExecutionResult {
            hook_command: command.into(),
            outcome,
            exit_code: match outcome {
                HookOutcome::Allowed => Some(0),
                HookOutcome::Blocked => Some(2),
                HookOutcome::Errored => Some(1),
                HookOutcome::TimedOut => None,
            },
            stdout: String::new(),
            stderr: stderr.into(),
            duration_ms: 10,
        }
    }

    #[test]
    fn all_allowed_yields_allow() {
        let verdict = AggregateVerdict::from_results(
            vec![
                result("a.sh", HookOutcome::Allowed, ""),
                result("b.sh", HookOutcome::Allowed, ""),
            ],
            20,
        );
        assert_eq!(verdict.decision, Decision::Allow);
        assert!(verdict.blocking_hook.is_none());
    }

    #[test]
    fn first_block_wins_in_order() {
        let verdict = AggregateVerdict::from_results(
            vec![
                result("a.sh", HookOutcome::Allowed, ""),
                result("b.sh", HookOutcome::Blocked, "b says no"),
                result("c.sh", HookOutcome::Blocked, "c says no"),
            ],
            30,
        );
        assert_eq!(verdict.decision, Decision::Block);
        assert_eq!(verdict.blocking_hook.as_deref(), Some("b.sh"));
        assert_eq!(verdict.blocking_message.as_deref(), Some("b says no"));
    }

    #[test]
    fn errored_and_timed_out_never_block() {
        let verdict = AggregateVerdict::from_results(
            vec![
                result("a.sh", HookOutcome::Errored, "crash"),
                result("b.sh", HookOutcome::TimedOut, "partial"),
            ],
            5100,
        );
        assert_eq!(verdict.decision, Decision::Allow);
    }

    #[test]
    fn fold_is_deterministic() {
        let results = vec![
            result("a.sh", HookOutcome::Allowed, ""),
            result("b.sh", HookOutcome::Blocked, "no"),
        ];
        let first = AggregateVerdict::from_results(results.clone(), 15);
        let second = AggregateVerdict::from_results(results, 15);
        assert_eq!(first.decision, second.decision);
        assert_eq!(first.blocking_hook, second.blocking_hook);
        assert_eq!(first.blocking_message, second.blocking_message);
    }
}
