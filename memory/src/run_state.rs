//! Persisted setup progress.
//!
//! A small JSON document shared with other setup tooling. Only `setup_status.memory_id` is
//! interpreted here; every other key is kept as-is on save.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{MemoryError, Result};

const SETUP_STATUS: &str = "setup_status";
const MEMORY_ID: &str = "memory_id";

/// Progress document, optionally backed by a file.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    path: Option<PathBuf>,
    progress: Map<String, Value>,
}

impl ProgressTracker {
    /// Loads `path`; a missing file is an empty document.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let progress = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&raw)? {
                    Value::Object(map) => map,
                    _ => {
                        return Err(MemoryError::RunState(format!(
                            "{} is not a JSON object",
                            path.display()
                        )))
                    }
                }
            }
        } else {
            Map::new()
        };
        debug!(path = %path.display(), "Loaded run-state");
        Ok(Self {
            path: Some(path),
            progress,
        })
    }

    /// Document that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            progress: Map::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn progress(&self) -> &Map<String, Value> {
        &self.progress
    }

    pub fn memory_id(&self) -> Option<String> {
        self.progress
            .get(SETUP_STATUS)
            .and_then(|s| s.get(MEMORY_ID))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    /// Records the memory id and saves.
    pub fn set_memory_id(&mut self, memory_id: &str) -> Result<()> {
        let status = self
            .progress
            .entry(SETUP_STATUS)
            .or_insert_with(|| Value::Object(Map::new()));
        if !status.is_object() {
            *status = Value::Object(Map::new());
        }
        if let Value::Object(status) = status {
            status.insert(MEMORY_ID.to_string(), Value::String(memory_id.to_string()));
        }
        self.save()
    }

    /// Forgets the memory id and saves. Other setup keys stay.
    pub fn clear_memory_id(&mut self) -> Result<()> {
        if let Some(Value::Object(status)) = self.progress.get_mut(SETUP_STATUS) {
            status.remove(MEMORY_ID);
        }
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.progress)?;
        fs::write(path, json)?;
        Ok(())
    }
}
