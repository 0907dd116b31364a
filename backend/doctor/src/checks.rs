//! The individual doctor checks.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use hookforge_core::{Event, HookDescriptor, HookEvent, ToolInput};
use hookforge_engine::{execute_parallel, filter_bypassed};
use hookforge_policy::{group_flag_name, BypassState, GROUP_ENV_PREFIX};
use hookforge_registry::Registry;
use hookforge_runner::run_hook;

use crate::report::{DoctorReport, HookCheck, LatencyCheck, RegistryCheck};

/// What to diagnose and against which target.
#[derive(Debug, Clone)]
pub struct DoctorOptions {
    pub primary_path: PathBuf,
    pub backup_path: PathBuf,
    pub latency_target_ms: u64,
    /// Skip the per-hook smoke runs and the end-to-end timing (config-only
    /// mode).
    pub skip_execution: bool,
}

/// Synthetic event used for smoke and end-to-end runs. The probe path
/// lives under `src/` so root-level guard hooks treat it as legitimate.
fn probe_event() -> Event {
    Event {
        tool_name: "Write".into(),
        tool_input: ToolInput {
            file_path: Some("src/hookforge-doctor-probe.js".into()),
            content: Some("// doctor probe".into()),
            ..Default::default()
        },
        prompt: None,
    }
}

/// Run every check and assemble the report.
pub async fn run_doctor(options: &DoctorOptions, bypass: &BypassState) -> DoctorReport {
    let primary = check_registry(&options.primary_path);
    let backup = check_registry(&options.backup_path);

    let registry = Registry::load(&options.primary_path).ok();

    let mut group_flags: Vec<(String, bool)> = bypass
        .group_flags()
        .iter()
        .map(|(k, v)| (k.clone(), *v))
        .collect();
    group_flags.sort();

    let unknown_flags = match &registry {
        Some(registry) => group_flags
            .iter()
            .filter(|(suffix, _)| {
                !registry.groups().iter().any(|g| {
                    group_flag_name(g)
                        .strip_prefix(GROUP_ENV_PREFIX)
                        .map_or(false, |s| s == suffix.as_str())
                })
            })
            .map(|(suffix, _)| format!("{GROUP_ENV_PREFIX}{suffix}"))
            .collect(),
        None => Vec::new(),
    };

    let mut hooks = Vec::new();
    if let Some(registry) = &registry {
        let payload = probe_event().to_payload().unwrap_or_else(|_| "{}".into());
        for descriptor in registry.all_descriptors() {
            hooks.push(check_hook(descriptor, bypass, &payload, options.skip_execution).await);
        }
    }

    let latency = if options.skip_execution {
        None
    } else {
        match &registry {
            Some(registry) => {
                check_latency(registry, bypass, options.latency_target_ms).await
            }
            None => None,
        }
    };

    DoctorReport {
        generated_at: Utc::now(),
        primary,
        backup,
        dev_mode: bypass.dev_mode(),
        test_mode: bypass.test_mode(),
        group_flags,
        unknown_flags,
        hooks,
        latency,
    }
}

fn check_registry(path: &Path) -> RegistryCheck {
    match Registry::load(path) {
        Ok(registry) => RegistryCheck::Ok {
            path: path.to_path_buf(),
            groups: registry.groups().to_vec(),
            hook_count: registry.all_descriptors().count(),
        },
        Err(e) => RegistryCheck::Failed {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    }
}

async fn check_hook(
    descriptor: &HookDescriptor,
    bypass: &BypassState,
    payload: &str,
    skip_execution: bool,
) -> HookCheck {
    let program = descriptor
        .command
        .split_whitespace()
        .next()
        .unwrap_or_default();
    let metadata = std::fs::metadata(program).ok();
    let exists = metadata.is_some();
    let executable = is_executable(metadata.as_ref());
    let bypassed_by = bypass
        .bypass_reason(&descriptor.group)
        .map(|reason| reason.flag_name());

    let (smoke, smoke_duration_ms) = if skip_execution || !exists {
        (None, None)
    } else {
        debug!(command = %descriptor.command, "smoke-testing hook");
        let result = run_hook(descriptor, payload).await;
        (Some(result.outcome), Some(result.duration_ms))
    };

    HookCheck {
        command: descriptor.command.clone(),
        group: descriptor.group.clone(),
        exists,
        executable,
        bypassed_by,
        smoke,
        smoke_duration_ms,
    }
}

#[cfg(unix)]
fn is_executable(metadata: Option<&std::fs::Metadata>) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.map_or(false, |m| m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(metadata: Option<&std::fs::Metadata>) -> bool {
    metadata.is_some()
}

async fn check_latency(
    registry: &Registry,
    bypass: &BypassState,
    target_ms: u64,
) -> Option<LatencyCheck> {
    let groups = filter_bypassed(
        registry.hooks_for(HookEvent::PreToolUse, "Write"),
        bypass,
    );
    if groups.is_empty() {
        return None;
    }
    let hook_count: usize = groups.iter().map(|g| g.hooks.len()).sum();
    let verdict = execute_parallel(&groups, &probe_event()).await.ok()?;
    Some(LatencyCheck {
        hook_count,
        total_ms: verdict.total_duration_ms,
        target_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_script(body: &str) -> PathBuf {
        let path =
            std::env::temp_dir().join(format!("hookforge-doc-{}.sh", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        writeln!(file, "{body}").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    fn write_registry(command: &str) -> PathBuf {
        let doc = format!(
            r#"{{"groups": ["pre-blocking"], "events": {{"PreToolUse": [
                {{"command": "{command}", "matcher": ["*"], "timeout_ms": 5000, "group": "pre-blocking"}}
            ]}}}}"#
        );
        let path =
            std::env::temp_dir().join(format!("hookforge-docreg-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, doc).unwrap();
        path
    }

    fn no_bypass() -> BypassState {
        BypassState::from_vars(&HashMap::new())
    }

    #[tokio::test]
    async fn healthy_setup_reports_healthy() {
        let script = write_script("exit 0");
        let registry = write_registry(&script.display().to_string());
        let options = DoctorOptions {
            primary_path: registry.clone(),
            backup_path: registry.clone(),
            latency_target_ms: 5000,
            skip_execution: false,
        };
        let report = run_doctor(&options, &no_bypass()).await;
        assert!(report.healthy(), "report: {report}");
        assert_eq!(report.hooks.len(), 1);
        assert!(report.latency.is_some());
        std::fs::remove_file(script).ok();
        std::fs::remove_file(registry).ok();
    }

    #[tokio::test]
    async fn missing_hook_binary_is_flagged() {
        let registry = write_registry("/nonexistent/hookforge-doctor-binary");
        let options = DoctorOptions {
            primary_path: registry.clone(),
            backup_path: registry.clone(),
            latency_target_ms: 5000,
            skip_execution: true,
        };
        let report = run_doctor(&options, &no_bypass()).await;
        assert!(!report.healthy());
        assert!(!report.hooks[0].exists);
        std::fs::remove_file(registry).ok();
    }

    #[tokio::test]
    async fn unusable_registry_fails_health() {
        let options = DoctorOptions {
            primary_path: PathBuf::from("/nonexistent/hooks.json"),
            backup_path: PathBuf::from("/nonexistent/hooks.backup.json"),
            latency_target_ms: 5000,
            skip_execution: true,
        };
        let report = run_doctor(&options, &no_bypass()).await;
        assert!(!report.healthy());
        assert!(report.latency.is_none());
    }

    #[tokio::test]
    async fn unknown_group_flag_is_reported() {
        let script = write_script("exit 0");
        let registry = write_registry(&script.display().to_string());
        let vars: HashMap<String, String> = [(
            "HOOKFORGE_GROUP_NO_SUCH_GROUP".to_string(),
            "false".to_string(),
        )]
        .into();
        let options = DoctorOptions {
            primary_path: registry.clone(),
            backup_path: registry.clone(),
            latency_target_ms: 5000,
            skip_execution: true,
        };
        let report = run_doctor(&options, &BypassState::from_vars(&vars)).await;
        assert_eq!(
            report.unknown_flags,
            vec!["HOOKFORGE_GROUP_NO_SUCH_GROUP".to_string()]
        );
        std::fs::remove_file(script).ok();
        std::fs::remove_file(registry).ok();
    }
}
