//! `hookforge` binary: the host-facing entry point.
//!
//! Contract with the host: one JSON event on stdin, exit code 0 to allow
//! the operation or 2 to block it, with the blocking hook's stderr text
//! echoed on stderr. Everything else the engine does is invisible to the
//! host; internal failures degrade to allow.

use std::io::Read;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use uuid::Uuid;

use hookforge_core::{Event, HookEvent};
use hookforge_doctor::{latency_target_ms, run_doctor, DoctorOptions};
use hookforge_policy::BypassState;
use hookforge_registry::{backup_registry_path, primary_registry_path};

/// Exit code signalling a blocked operation to the host.
const BLOCK_EXIT_CODE: i32 = 2;

#[derive(Parser)]
#[command(name = "hookforge")]
#[command(about = "Parallel hook execution engine for AI coding-assistant hosts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read one event from stdin, run the configured hooks, and exit 0
    /// (allow) or 2 (block)
    Run {
        /// Host lifecycle event the hooks fire for
        #[arg(long, default_value = "PreToolUse")]
        event: String,
    },
    /// Diagnose registry, bypass-flag, and hook health offline
    Doctor {
        /// Only check configuration; skip smoke runs and latency timing
        #[arg(long)]
        config_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr behind an env filter, quiet by default: the host
    // reads stderr for block reasons, so only explicit verbosity may add
    // noise there.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { event } => {
            let exit_code = run_command(&event).await;
            std::process::exit(exit_code);
        }
        Commands::Doctor { config_only } => {
            let options = DoctorOptions {
                primary_path: primary_registry_path(),
                backup_path: backup_registry_path(),
                latency_target_ms: latency_target_ms(),
                skip_execution: config_only,
            };
            let report = run_doctor(&options, &BypassState::from_env()).await;
            print!("{report}");
            std::process::exit(if report.healthy() { 0 } else { 1 });
        }
    }
}

/// Handle one host invocation. Never returns an error to the host: every
/// internal failure resolves to allow (exit 0).
async fn run_command(event_kind: &str) -> i32 {
    let kind: HookEvent = match event_kind.parse() {
        Ok(kind) => kind,
        Err(e) => {
            warn!(error = %e, "unknown event kind; allowing");
            return 0;
        }
    };

    let mut raw = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut raw) {
        warn!(error = %e, "failed to read event from stdin; allowing");
        return 0;
    }

    let event: Event = match serde_json::from_str(&raw) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "unparseable event payload; allowing");
            return 0;
        }
    };

    let invocation_id = Uuid::new_v4();
    info!(
        invocation = %invocation_id,
        tool = %event.tool_name,
        event = kind.as_str(),
        "hookforge invocation"
    );

    let verdict = hookforge_engine::run_event(&event, kind).await;
    info!(
        invocation = %invocation_id,
        decision = ?verdict.decision,
        hooks = verdict.results.len(),
        total_ms = verdict.total_duration_ms,
        "verdict"
    );

    if verdict.is_blocked() {
        if let Some(message) = &verdict.blocking_message {
            eprint!("{message}");
            if !message.ends_with('\n') {
                eprintln!();
            }
        }
        return BLOCK_EXIT_CODE;
    }
    0
}
