//! Bypass state snapshot and precedence rules.
//!
//! Precedence, strongest first:
//! 1. `HOOKFORGE_DEV_MODE=true` bypasses every group unconditionally.
//! 2. `HOOKFORGE_TEST_MODE=true` does the same under a distinct flag.
//! 3. `HOOKFORGE_GROUP_<NAME>=false` bypasses only that group.
//! 4. `HOOKFORGE_GROUP_<NAME>=true` forces the group to run against any
//!    narrower skip, but never overrides rules 1–2.
//! 5. No flag at all means run (fail-open default).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{DEV_MODE_ENV, GROUP_ENV_PREFIX, TEST_MODE_ENV};

/// Matches the group segment of a hook command path, e.g.
/// `.hookforge/hooks/pre-blocking/no-root.sh` → `pre-blocking`.
static GROUP_PATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"hooks/([A-Za-z0-9_-]+)/").unwrap());

/// Which flag caused a group to be bypassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BypassReason {
    DevMode,
    TestMode,
    GroupDisabled(String),
}

impl BypassReason {
    /// Name of the environment variable responsible.
    pub fn flag_name(&self) -> String {
        match self {
            Self::DevMode => DEV_MODE_ENV.to_string(),
            Self::TestMode => TEST_MODE_ENV.to_string(),
            Self::GroupDisabled(group) => group_flag_name(group),
        }
    }
}

/// Per-group flag name for a group, e.g. `HOOKFORGE_GROUP_PRE_BLOCKING`.
pub fn group_flag_name(group: &str) -> String {
    let upper: String = group
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{GROUP_ENV_PREFIX}{upper}")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Snapshot of the bypass-relevant environment, taken once per invocation.
///
/// Pure after construction: every query is a function of the snapshot and
/// the group name, so diagnostics can replay the same answers the engine
/// saw.
#[derive(Debug, Clone, Default)]
pub struct BypassState {
    dev_mode: bool,
    test_mode: bool,
    group_flags: HashMap<String, bool>,
}

impl BypassState {
    /// Capture the current process environment.
    pub fn from_env() -> Self {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Build from an explicit variable map (diagnostics and tests).
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let flag = |name: &str| vars.get(name).and_then(|v| parse_bool(v)).unwrap_or(false);
        let group_flags = vars
            .iter()
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(GROUP_ENV_PREFIX)?;
                Some((name.to_string(), parse_bool(value)?))
            })
            .collect();
        Self {
            dev_mode: flag(DEV_MODE_ENV),
            test_mode: flag(TEST_MODE_ENV),
            group_flags,
        }
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    /// Per-group flags present in the snapshot, as (flag suffix, value).
    pub fn group_flags(&self) -> &HashMap<String, bool> {
        &self.group_flags
    }

    /// Should hooks in this group be skipped for the current invocation?
    pub fn should_bypass(&self, group: &str) -> bool {
        self.bypass_reason(group).is_some()
    }

    /// The flag responsible for a bypass, if any. Precedence per module doc.
    pub fn bypass_reason(&self, group: &str) -> Option<BypassReason> {
        if self.dev_mode {
            return Some(BypassReason::DevMode);
        }
        if self.test_mode {
            return Some(BypassReason::TestMode);
        }
        let flag = group_flag_name(group);
        let suffix = flag.strip_prefix(GROUP_ENV_PREFIX).unwrap_or(flag.as_str());
        match self.group_flags.get(suffix) {
            Some(false) => Some(BypassReason::GroupDisabled(group.to_string())),
            // Explicit true forces the group to run; absence also runs.
            Some(true) | None => None,
        }
    }

    /// Diagnostics query: would the hook at `command` be bypassed, and by
    /// which flag? The group is derived from the command path.
    pub fn explain_command(&self, command: &str) -> Option<BypassReason> {
        let group = group_from_command(command)?;
        let reason = self.bypass_reason(&group);
        if let Some(ref r) = reason {
            debug!(command, flag = %r.flag_name(), "hook bypassed");
        }
        reason
    }
}

/// Derive the priority group from a hook command path.
///
/// Hooks live under a `hooks/<group>/` directory by convention; commands
/// outside that layout have no derivable group.
pub fn group_from_command(command: &str) -> Option<String> {
    GROUP_PATH_PATTERN
        .captures(command)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(pairs: &[(&str, &str)]) -> BypassState {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BypassState::from_vars(&vars)
    }

    #[test]
    fn no_flags_means_run() {
        let state = state(&[]);
        assert!(!state.should_bypass("pre-blocking"));
        assert_eq!(state.bypass_reason("pre-blocking"), None);
    }

    #[test]
    fn dev_mode_bypasses_every_group() {
        let state = state(&[("HOOKFORGE_DEV_MODE", "true")]);
        assert!(state.should_bypass("pre-blocking"));
        assert!(state.should_bypass("post-fix"));
        assert_eq!(
            state.bypass_reason("post-fix"),
            Some(BypassReason::DevMode)
        );
    }

    #[test]
    fn test_mode_bypasses_under_distinct_flag() {
        let state = state(&[("HOOKFORGE_TEST_MODE", "1")]);
        assert_eq!(
            state.bypass_reason("pre-advisory"),
            Some(BypassReason::TestMode)
        );
    }

    #[test]
    fn group_false_bypasses_only_that_group() {
        let state = state(&[("HOOKFORGE_GROUP_PRE_ADVISORY", "false")]);
        assert!(state.should_bypass("pre-advisory"));
        assert!(!state.should_bypass("pre-blocking"));
    }

    #[test]
    fn group_true_does_not_override_dev_mode() {
        let state = state(&[
            ("HOOKFORGE_DEV_MODE", "true"),
            ("HOOKFORGE_GROUP_PRE_BLOCKING", "true"),
        ]);
        assert!(state.should_bypass("pre-blocking"));
        assert_eq!(
            state.bypass_reason("pre-blocking"),
            Some(BypassReason::DevMode)
        );
    }

    #[test]
    fn group_true_runs_the_group() {
        let state = state(&[("HOOKFORGE_GROUP_PRE_BLOCKING", "true")]);
        assert!(!state.should_bypass("pre-blocking"));
    }

    #[test]
    fn garbage_flag_values_are_ignored() {
        let state = state(&[("HOOKFORGE_GROUP_PRE_BLOCKING", "maybe")]);
        assert!(!state.should_bypass("pre-blocking"));
    }

    #[test]
    fn derives_group_from_command_path() {
        assert_eq!(
            group_from_command(".hookforge/hooks/pre-blocking/no-root.sh"),
            Some("pre-blocking".to_string())
        );
        assert_eq!(group_from_command("/usr/bin/true"), None);
    }

    #[test]
    fn explain_command_names_the_flag() {
        let state = state(&[("HOOKFORGE_GROUP_POST_FIX", "false")]);
        let reason = state
            .explain_command(".hookforge/hooks/post-fix/format.sh")
            .unwrap();
        assert_eq!(reason.flag_name(), "HOOKFORGE_GROUP_POST_FIX");
    }

    #[test]
    fn flag_name_normalizes_group_names() {
        assert_eq!(group_flag_name("pre-blocking"), "HOOKFORGE_GROUP_PRE_BLOCKING");
        assert_eq!(group_flag_name("post-fix"), "HOOKFORGE_GROUP_POST_FIX");
    }
}
