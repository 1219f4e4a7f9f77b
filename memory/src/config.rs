//! Memory configuration: trait and env-based implementation.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{MemoryError, Result};
use crate::strategies::{DEFAULT_EVENT_EXPIRY_DAYS, DEFAULT_MEMORY_DESCRIPTION, DEFAULT_MEMORY_NAME};

/// Memory store and retrieval configuration interface.
pub trait MemoryConfig: Send + Sync {
    fn memory_name(&self) -> &str;
    fn memory_description(&self) -> &str;
    fn event_expiry_days(&self) -> u32;
    fn progress_file(&self) -> &Path;
    /// JSON snapshot of the local memory service; `None` keeps it in process memory only.
    fn snapshot_path(&self) -> Option<&Path>;
    fn top_k(&self) -> usize;
    fn actor_id(&self) -> &str;
}

/// Memory config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvMemoryConfig {
    pub memory_name: String,
    pub memory_description: String,
    pub memory_event_expiry_days: u32,
    pub memory_progress_file: PathBuf,
    pub memory_snapshot_path: Option<PathBuf>,
    pub memory_top_k: usize,
    pub actor_id: String,
}

impl Default for EnvMemoryConfig {
    fn default() -> Self {
        Self {
            memory_name: DEFAULT_MEMORY_NAME.to_string(),
            memory_description: DEFAULT_MEMORY_DESCRIPTION.to_string(),
            memory_event_expiry_days: DEFAULT_EVENT_EXPIRY_DAYS,
            memory_progress_file: PathBuf::from("./progress.json"),
            memory_snapshot_path: None,
            memory_top_k: 2,
            actor_id: "customer_001".to_string(),
        }
    }
}

impl MemoryConfig for EnvMemoryConfig {
    fn memory_name(&self) -> &str {
        &self.memory_name
    }
    fn memory_description(&self) -> &str {
        &self.memory_description
    }
    fn event_expiry_days(&self) -> u32 {
        self.memory_event_expiry_days
    }
    fn progress_file(&self) -> &Path {
        &self.memory_progress_file
    }
    fn snapshot_path(&self) -> Option<&Path> {
        self.memory_snapshot_path.as_deref()
    }
    fn top_k(&self) -> usize {
        self.memory_top_k
    }
    fn actor_id(&self) -> &str {
        &self.actor_id
    }
}

impl EnvMemoryConfig {
    /// Load from environment variables. Unset variables fall back to defaults; set but
    /// unparsable numbers are an error.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let memory_name = env::var("MEMORY_NAME").unwrap_or(defaults.memory_name);
        let memory_description =
            env::var("MEMORY_DESCRIPTION").unwrap_or(defaults.memory_description);
        let memory_event_expiry_days = parse_var(
            "MEMORY_EVENT_EXPIRY_DAYS",
            defaults.memory_event_expiry_days,
        )?;
        let memory_progress_file = env::var("MEMORY_PROGRESS_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.memory_progress_file);
        let memory_snapshot_path = env::var("MEMORY_SNAPSHOT_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let memory_top_k = parse_var("MEMORY_TOP_K", defaults.memory_top_k)?;
        let actor_id = env::var("ACTOR_ID")
            .or_else(|_| env::var("CUSTOMER_ID"))
            .unwrap_or(defaults.actor_id);
        Ok(Self {
            memory_name,
            memory_description,
            memory_event_expiry_days,
            memory_progress_file,
            memory_snapshot_path,
            memory_top_k,
            actor_id,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| MemoryError::Config(format!("{} is not a valid number: {}", name, raw))),
        Err(_) => Ok(default),
    }
}
