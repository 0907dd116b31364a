//! Hook descriptors loaded from the registry.

use serde::{Deserialize, Serialize};

/// One configured hook: the external command to run, which tool operations
/// it applies to, how long it may take, and which priority group it belongs
/// to. Immutable once loaded; identified by its `command` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookDescriptor {
    /// Executable invocation, whitespace-separated (program + args).
    pub command: String,
    /// Tool-name tags this hook applies to. `"*"` matches every tool.
    #[serde(default)]
    pub matcher: Vec<String>,
    /// Absolute per-hook time budget. The child is killed when it elapses.
    pub timeout_ms: u64,
    /// Priority group name; ordering comes from the registry's group list.
    pub group: String,
}

impl HookDescriptor {
    /// True when this hook applies to the given tool name.
    ///
    /// An empty matcher list matches nothing (a hook without matchers never
    /// fires), while a `"*"` entry matches everything.
    pub fn matches_tool(&self, tool_name: &str) -> bool {
        self.matcher.iter().any(|m| m == "*" || m == tool_name)
    }
}

/// Hooks of one priority group, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct GroupedHooks {
    pub group: String,
    pub hooks: Vec<HookDescriptor>,
}
