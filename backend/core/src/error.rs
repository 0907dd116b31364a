use thiserror::Error;

/// Top-level error taxonomy for the hookforge engine.
///
/// Individual hook failures are deliberately absent: a crashing, erroring,
/// or timed-out hook is recorded as data (`HookOutcome::Errored` /
/// `TimedOut` inside an `ExecutionResult`) and resolves to allow. Only
/// registry corruption and orchestration-level failures are errors, and
/// both are absorbed before they reach the host.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("registry corrupt at {path}: {message}")]
    RegistryCorrupt { path: String, message: String },

    #[error("registry unreadable at {path}: {source}")]
    RegistryUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("orchestration failure: {0}")]
    Orchestration(String),
}
