//! Doctor report structure and human-readable rendering.
//!
//! The rendered text is for engineers, not machines; nothing here is a
//! stable format.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use hookforge_core::HookOutcome;

/// Health of one registry file.
#[derive(Debug, Clone)]
pub enum RegistryCheck {
    Ok {
        path: PathBuf,
        groups: Vec<String>,
        hook_count: usize,
    },
    Failed {
        path: PathBuf,
        message: String,
    },
}

impl RegistryCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// Health of one configured hook.
#[derive(Debug, Clone)]
pub struct HookCheck {
    pub command: String,
    pub group: String,
    /// First command token resolves to an existing file.
    pub exists: bool,
    /// That file carries an executable bit (unix).
    pub executable: bool,
    /// Flag name when the bypass policy would skip this hook.
    pub bypassed_by: Option<String>,
    /// Smoke-test outcome against a synthetic event, when attempted.
    pub smoke: Option<HookOutcome>,
    pub smoke_duration_ms: Option<u64>,
}

impl HookCheck {
    pub fn is_healthy(&self) -> bool {
        self.exists
            && self.executable
            && !matches!(self.smoke, Some(HookOutcome::Errored | HookOutcome::TimedOut))
    }
}

/// Timing of the synthetic end-to-end run.
#[derive(Debug, Clone)]
pub struct LatencyCheck {
    pub hook_count: usize,
    pub total_ms: u64,
    pub target_ms: u64,
}

impl LatencyCheck {
    pub fn within_target(&self) -> bool {
        self.total_ms <= self.target_ms
    }
}

/// Full diagnostics report.
#[derive(Debug, Clone)]
pub struct DoctorReport {
    pub generated_at: DateTime<Utc>,
    pub primary: RegistryCheck,
    pub backup: RegistryCheck,
    pub dev_mode: bool,
    pub test_mode: bool,
    /// Group flags present in the environment, as (flag suffix, value).
    pub group_flags: Vec<(String, bool)>,
    /// Group flags naming no group in the registry.
    pub unknown_flags: Vec<String>,
    pub hooks: Vec<HookCheck>,
    /// Absent when the primary registry was unusable or everything was
    /// bypassed.
    pub latency: Option<LatencyCheck>,
}

impl DoctorReport {
    /// Full health: both registries parse, every hook is reachable and
    /// smoke-passes, and the end-to-end run met the latency target.
    pub fn healthy(&self) -> bool {
        self.primary.is_ok()
            && self.backup.is_ok()
            && self.hooks.iter().all(HookCheck::is_healthy)
            && self.latency.as_ref().map_or(true, LatencyCheck::within_target)
    }
}

fn status(ok: bool) -> &'static str {
    if ok {
        "🟢"
    } else {
        "🔴"
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n🔍 hookforge doctor — {}\n", self.generated_at.to_rfc3339())?;

        writeln!(f, "Registries:")?;
        for (label, check) in [("primary", &self.primary), ("backup", &self.backup)] {
            match check {
                RegistryCheck::Ok {
                    path,
                    groups,
                    hook_count,
                } => writeln!(
                    f,
                    "  🟢 {label} {} ({} groups: {}, {hook_count} hooks)",
                    path.display(),
                    groups.len(),
                    groups.join(" → "),
                )?,
                RegistryCheck::Failed { path, message } => {
                    writeln!(f, "  🔴 {label} {}: {message}", path.display())?
                }
            }
        }

        writeln!(f, "\nBypass flags:")?;
        if self.dev_mode {
            writeln!(f, "  🟡 HOOKFORGE_DEV_MODE set — every group bypassed")?;
        }
        if self.test_mode {
            writeln!(f, "  🟡 HOOKFORGE_TEST_MODE set — every group bypassed")?;
        }
        for (suffix, value) in &self.group_flags {
            writeln!(f, "  🟡 HOOKFORGE_GROUP_{suffix}={value}")?;
        }
        for flag in &self.unknown_flags {
            writeln!(f, "  🔴 {flag} names no group in the registry")?;
        }
        if !self.dev_mode
            && !self.test_mode
            && self.group_flags.is_empty()
            && self.unknown_flags.is_empty()
        {
            writeln!(f, "  🟢 none set; all groups run")?;
        }

        writeln!(f, "\nHooks:")?;
        if self.hooks.is_empty() {
            writeln!(f, "  🟡 no hooks configured")?;
        }
        for hook in &self.hooks {
            let mut notes: Vec<String> = Vec::new();
            if !hook.exists {
                notes.push("missing".into());
            } else if !hook.executable {
                notes.push("not executable".into());
            }
            if let Some(flag) = &hook.bypassed_by {
                notes.push(format!("bypassed by {flag}"));
            }
            if let (Some(outcome), Some(ms)) = (hook.smoke, hook.smoke_duration_ms) {
                notes.push(format!("smoke: {outcome:?} in {ms}ms"));
            }
            writeln!(
                f,
                "  {} {} [{}] {}",
                status(hook.is_healthy()),
                hook.command,
                hook.group,
                notes.join(", "),
            )?;
        }

        writeln!(f, "\nEnd-to-end:")?;
        match &self.latency {
            Some(latency) => writeln!(
                f,
                "  {} {} hooks in {}ms (target {}ms)",
                status(latency.within_target()),
                latency.hook_count,
                latency.total_ms,
                latency.target_ms,
            )?,
            None => writeln!(f, "  🟡 skipped (registry unusable or all hooks bypassed)")?,
        }

        writeln!(f)?;
        if self.healthy() {
            writeln!(f, "✅ All checks passed.")
        } else {
            writeln!(f, "❌ Some checks failed; see above.")
        }
    }
}
