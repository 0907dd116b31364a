//! Hook registry loading.
//!
//! The registry is a static JSON document enumerating, per host event type,
//! an ordered list of hook descriptors. A backup copy lives at a separate
//! path so the fallback executor can load hooks even when the primary file
//! is the thing that broke.

pub mod loader;
pub mod schema;

pub use loader::{backup_registry_path, primary_registry_path, Registry};

/// Env var overriding the primary registry path.
pub const REGISTRY_ENV: &str = "HOOKFORGE_REGISTRY";
/// Env var overriding the backup registry path.
pub const REGISTRY_BACKUP_ENV: &str = "HOOKFORGE_REGISTRY_BACKUP";

/// Default primary registry location, relative to the working directory.
pub const DEFAULT_REGISTRY_PATH: &str = ".hookforge/hooks.json";
/// Default backup registry location.
pub const DEFAULT_BACKUP_PATH: &str = ".hookforge/hooks.backup.json";
