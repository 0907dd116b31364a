//! On-disk registry document shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use hookforge_core::HookDescriptor;

/// Raw registry file as parsed from JSON.
///
/// `groups` encodes the authoritative priority order; `events` maps host
/// event names ("PreToolUse", "PostToolUse") to descriptor lists in
/// declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub events: HashMap<String, Vec<HookDescriptor>>,
}
