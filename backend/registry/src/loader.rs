//! Registry loading, validation, and event filtering.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use hookforge_core::{GroupedHooks, HookDescriptor, HookError, HookEvent};

use crate::schema::RegistryFile;
use crate::{
    DEFAULT_BACKUP_PATH, DEFAULT_REGISTRY_PATH, REGISTRY_BACKUP_ENV, REGISTRY_ENV,
};

/// Resolve the primary registry path from the environment or the default.
pub fn primary_registry_path() -> PathBuf {
    std::env::var(REGISTRY_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_REGISTRY_PATH))
}

/// Resolve the backup registry path from the environment or the default.
pub fn backup_registry_path() -> PathBuf {
    std::env::var(REGISTRY_BACKUP_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_BACKUP_PATH))
}

/// In-memory registry: descriptors per event, plus the group priority order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    groups: Vec<String>,
    events: HashMap<String, Vec<HookDescriptor>>,
}

impl Registry {
    /// Load and validate a registry file.
    ///
    /// Parse failures are `RegistryCorrupt`; the caller degrades to an
    /// empty hook set rather than failing the host operation. Duplicate
    /// commands within one event are a reported configuration error, not a
    /// fatal one: the last declaration wins.
    pub fn load(path: &Path) -> Result<Self, HookError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            HookError::RegistryUnreadable {
                path: path.display().to_string(),
                source,
            }
        })?;
        let file: RegistryFile =
            serde_json::from_str(&raw).map_err(|e| HookError::RegistryCorrupt {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::from_file(file))
    }

    /// Build a registry from an already-parsed document.
    pub fn from_file(file: RegistryFile) -> Self {
        let mut groups = file.groups;
        let mut events: HashMap<String, Vec<HookDescriptor>> = HashMap::new();

        for (event, descriptors) in file.events {
            let mut deduped: Vec<HookDescriptor> = Vec::with_capacity(descriptors.len());
            for descriptor in descriptors {
                // Groups the ordered list forgot about still run, after the
                // listed ones, in first-appearance order.
                if !groups.contains(&descriptor.group) {
                    warn!(
                        group = %descriptor.group,
                        "hook group not in registry group order; appending last"
                    );
                    groups.push(descriptor.group.clone());
                }
                if let Some(existing) = deduped
                    .iter()
                    .position(|d| d.command == descriptor.command)
                {
                    warn!(
                        command = %descriptor.command,
                        event = %event,
                        "duplicate hook command in registry; last declaration wins"
                    );
                    // Last declaration wins, but the hook stays in its
                    // first-declared slot: declaration order decides which
                    // blocker owns the verdict.
                    deduped[existing] = descriptor;
                } else {
                    deduped.push(descriptor);
                }
            }
            events.insert(event, deduped);
        }

        Self { groups, events }
    }

    /// Group priority order, highest priority first.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// All descriptors declared for an event, in declaration order.
    pub fn descriptors_for(&self, event: HookEvent) -> &[HookDescriptor] {
        self.events
            .get(event.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every descriptor across all events (diagnostics only).
    pub fn all_descriptors(&self) -> impl Iterator<Item = &HookDescriptor> {
        self.events.values().flatten()
    }

    /// Descriptors applicable to one event and tool name, grouped by
    /// priority in registry group order. Empty groups are omitted.
    pub fn hooks_for(&self, event: HookEvent, tool_name: &str) -> Vec<GroupedHooks> {
        let declared = self.descriptors_for(event);
        self.groups
            .iter()
            .filter_map(|group| {
                let hooks: Vec<HookDescriptor> = declared
                    .iter()
                    .filter(|d| d.group == *group && d.matches_tool(tool_name))
                    .cloned()
                    .collect();
                if hooks.is_empty() {
                    None
                } else {
                    Some(GroupedHooks {
                        group: group.clone(),
                        hooks,
                    })
                }
            })
            .collect()
    }
}
