//! In-process memory service with optional JSON snapshot.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use memory_core::{
    format_namespace, CreateMemoryRequest, Event, EventMessage, MemoryRecord, MemoryResource,
    MemoryService, MemoryStatus, MemoryStrategy,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::extract::{extract, score, terms};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredMemory {
    resource: MemoryResource,
    strategies: Vec<MemoryStrategy>,
    events: Vec<Event>,
    records: Vec<MemoryRecord>,
}

impl StoredMemory {
    /// Records of `namespace` ranked by query term overlap, then recency.
    fn rank(&self, namespace: &str, query: &str, top_k: usize) -> Vec<MemoryRecord> {
        let query_terms = terms(query);
        // Records are appended in time order; enumerate index doubles as recency.
        let mut ranked: Vec<(f32, usize, &MemoryRecord)> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.namespace == namespace)
            .map(|(i, r)| (score(&query_terms, &r.content.text), i, r))
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0).then(b.1.cmp(&a.1)));

        ranked
            .into_iter()
            .take(top_k)
            .map(|(s, _, r)| MemoryRecord {
                score: Some(s),
                ..r.clone()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ServiceState {
    memories: HashMap<String, StoredMemory>,
}

impl ServiceState {
    fn memory(&self, memory_id: &str) -> anyhow::Result<&StoredMemory> {
        self.memories
            .get(memory_id)
            .ok_or_else(|| anyhow!("Memory not found: {}", memory_id))
    }

    fn memory_mut(&mut self, memory_id: &str) -> anyhow::Result<&mut StoredMemory> {
        self.memories
            .get_mut(memory_id)
            .ok_or_else(|| anyhow!("Memory not found: {}", memory_id))
    }
}

/// JSON snapshot shared by every service opened on the same path, in any process.
///
/// Each access takes an advisory lock on `<path>.lock` (shared for reads, exclusive for writes)
/// and works on the file's current contents. Writes go to `<path>.tmp` and are renamed into place.
#[derive(Debug, Clone)]
struct SnapshotFile {
    path: PathBuf,
    lock_path: PathBuf,
    tmp_path: PathBuf,
}

impl SnapshotFile {
    fn new(path: PathBuf) -> Self {
        let sibling = |suffix: &str| {
            let mut name = path.clone().into_os_string();
            name.push(suffix);
            PathBuf::from(name)
        };
        Self {
            lock_path: sibling(".lock"),
            tmp_path: sibling(".tmp"),
            path,
        }
    }

    fn load(&self) -> anyhow::Result<ServiceState> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Invalid memory snapshot {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ServiceState::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read memory snapshot {}", self.path.display())),
        }
    }

    fn write(&self, state: &ServiceState) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.tmp_path, json)
            .and_then(|()| std::fs::rename(&self.tmp_path, &self.path))
            .with_context(|| format!("Failed to write memory snapshot {}", self.path.display()))
    }

    /// Loads the current snapshot under the lock, applies `apply`, and writes the result back when
    /// `exclusive` and `apply` succeeded. Returns the state as left in the file.
    fn transact<T>(
        &self,
        exclusive: bool,
        apply: impl FnOnce(&mut ServiceState) -> anyhow::Result<T>,
    ) -> anyhow::Result<(ServiceState, T)> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .with_context(|| format!("Failed to open {}", self.lock_path.display()))?;
        if exclusive {
            fs2::FileExt::lock_exclusive(&lock)
        } else {
            fs2::FileExt::lock_shared(&lock)
        }
        .with_context(|| format!("Failed to lock {}", self.lock_path.display()))?;

        // Released when `lock` drops.
        let mut state = self.load()?;
        let value = apply(&mut state)?;
        if exclusive {
            self.write(&state)?;
        }
        Ok((state, value))
    }
}

/// Memory service backed by a map behind a tokio `RwLock`. Clones share state.
///
/// With a snapshot the file is the source of truth: every call reloads it under a file lock, so
/// services in separate processes opened on one path see each other's writes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemoryService {
    state: Arc<RwLock<ServiceState>>,
    snapshot: Option<SnapshotFile>,
}

impl InMemoryMemoryService {
    /// Empty service without persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Service persisted to `path`. A missing file is an empty store; an unreadable one is an
    /// error.
    pub async fn with_snapshot(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let service = Self {
            state: Arc::default(),
            snapshot: Some(SnapshotFile::new(path.clone())),
        };
        let memories = service
            .with_state(false, |state| Ok(state.memories.len()))
            .await?;
        info!(path = %path.display(), memories, "Opened memory snapshot");
        Ok(service)
    }

    /// Number of stores.
    pub async fn memory_count(&self) -> anyhow::Result<usize> {
        self.with_state(false, |state| Ok(state.memories.len()))
            .await
    }

    /// All events written to a store, oldest first.
    pub async fn events(&self, memory_id: &str) -> anyhow::Result<Vec<Event>> {
        let memory_id = memory_id.to_string();
        self.with_state(false, move |state| Ok(state.memory(&memory_id)?.events.clone()))
            .await
    }

    /// Runs `apply` against the current state. Without a snapshot that is the in-process map;
    /// with one it is the file's contents, locked for the duration and written back when
    /// `exclusive`.
    async fn with_state<T, F>(&self, exclusive: bool, apply: F) -> anyhow::Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut ServiceState) -> anyhow::Result<T> + Send + 'static,
    {
        let mut state = self.state.write().await;
        let Some(snapshot) = self.snapshot.clone() else {
            return apply(&mut *state);
        };
        let (fresh, value) =
            tokio::task::spawn_blocking(move || snapshot.transact(exclusive, apply))
                .await
                .context("Memory snapshot task failed")??;
        *state = fresh;
        Ok(value)
    }
}

/// One record per (strategy, message, namespace) the strategy extracts.
fn extract_records(
    strategies: &[MemoryStrategy],
    messages: &[EventMessage],
    actor_id: &str,
    now: DateTime<Utc>,
) -> Vec<MemoryRecord> {
    let mut extracted = Vec::new();
    for strategy in strategies {
        for message in messages {
            if let Some(text) = extract(strategy, message) {
                for template in &strategy.namespaces {
                    extracted.push(MemoryRecord {
                        created_at: Some(now),
                        ..MemoryRecord::new(text.clone(), format_namespace(template, actor_id))
                    });
                }
            }
        }
    }
    extracted
}

#[async_trait]
impl MemoryService for InMemoryMemoryService {
    async fn create_memory_and_wait(
        &self,
        request: CreateMemoryRequest,
    ) -> Result<MemoryResource, anyhow::Error> {
        let id = format!("{}-{}", request.name, Uuid::new_v4().simple());
        let resource = MemoryResource {
            id: id.clone(),
            name: request.name,
            description: request.description,
            status: MemoryStatus::Active,
            event_expiry_days: request.event_expiry_days,
            created_at: Utc::now(),
        };

        let stored = StoredMemory {
            resource: resource.clone(),
            strategies: request.strategies,
            events: Vec::new(),
            records: Vec::new(),
        };
        self.with_state(true, move |state| {
            state.memories.insert(id, stored);
            Ok(())
        })
        .await?;

        info!(memory_id = %resource.id, name = %resource.name, "Memory created");
        Ok(resource)
    }

    async fn get_memory(&self, memory_id: &str) -> Result<MemoryResource, anyhow::Error> {
        let memory_id = memory_id.to_string();
        self.with_state(false, move |state| {
            Ok(state.memory(&memory_id)?.resource.clone())
        })
        .await
    }

    async fn get_memory_strategies(
        &self,
        memory_id: &str,
    ) -> Result<Vec<MemoryStrategy>, anyhow::Error> {
        let memory_id = memory_id.to_string();
        self.with_state(false, move |state| {
            Ok(state.memory(&memory_id)?.strategies.clone())
        })
        .await
    }

    async fn retrieve_memories(
        &self,
        memory_id: &str,
        namespace: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<MemoryRecord>, anyhow::Error> {
        let (id, ns, q) = (memory_id.to_string(), namespace.to_string(), query.to_string());
        let results = self
            .with_state(false, move |state| Ok(state.memory(&id)?.rank(&ns, &q, top_k)))
            .await?;

        debug!(
            memory_id = %memory_id,
            namespace = %namespace,
            top_k = top_k,
            found = results.len(),
            "Retrieved memories"
        );
        Ok(results)
    }

    async fn create_event(
        &self,
        memory_id: &str,
        actor_id: &str,
        session_id: &str,
        messages: Vec<EventMessage>,
    ) -> Result<Event, anyhow::Error> {
        let event = Event {
            event_id: Uuid::new_v4(),
            memory_id: memory_id.to_string(),
            actor_id: actor_id.to_string(),
            session_id: session_id.to_string(),
            messages,
            created_at: Utc::now(),
        };
        let stored_event = event.clone();
        let record_count = self
            .with_state(true, move |state| {
                let memory = state.memory_mut(&stored_event.memory_id)?;
                let records = extract_records(
                    &memory.strategies,
                    &stored_event.messages,
                    &stored_event.actor_id,
                    stored_event.created_at,
                );
                let count = records.len();
                memory.records.extend(records);
                memory.events.push(stored_event);
                Ok(count)
            })
            .await?;

        info!(
            memory_id = %memory_id,
            actor_id = %actor_id,
            session_id = %session_id,
            messages = event.messages.len(),
            records = record_count,
            "Event created"
        );
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory_core::StrategyType;

    fn request() -> CreateMemoryRequest {
        CreateMemoryRequest {
            name: "TestMemory".to_string(),
            description: "test".to_string(),
            strategies: vec![
                MemoryStrategy::new(
                    "CustomerPreferences",
                    "prefs",
                    StrategyType::UserPreference,
                    vec!["support/customer/{actorId}/preferences".to_string()],
                ),
                MemoryStrategy::new(
                    "CustomerSemanticMemory",
                    "facts",
                    StrategyType::Semantic,
                    vec!["support/customer/{actorId}/semantic".to_string()],
                ),
            ],
            event_expiry_days: 90,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_memory() {
        let service = InMemoryMemoryService::new();
        let created = service.create_memory_and_wait(request()).await.unwrap();
        assert_eq!(created.status, MemoryStatus::Active);

        let fetched = service.get_memory(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(service.get_memory_strategies(&created.id).await.unwrap().len(), 2);
        assert!(service.get_memory("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_event_extracted_per_actor_namespace() {
        let service = InMemoryMemoryService::new();
        let memory = service.create_memory_and_wait(request()).await.unwrap();

        service
            .create_event(
                &memory.id,
                "customer_001",
                "s1",
                vec![
                    EventMessage::user("I prefer ThinkPad models"),
                    EventMessage::assistant("Noted."),
                ],
            )
            .await
            .unwrap();

        let prefs = service
            .retrieve_memories(&memory.id, "support/customer/customer_001/preferences", "thinkpad", 5)
            .await
            .unwrap();
        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs[0].text(), Some("I prefer ThinkPad models"));

        let semantic = service
            .retrieve_memories(&memory.id, "support/customer/customer_001/semantic", "thinkpad", 5)
            .await
            .unwrap();
        assert_eq!(semantic.len(), 2);
        assert_eq!(semantic[0].text(), Some("I prefer ThinkPad models"));

        let other_actor = service
            .retrieve_memories(&memory.id, "support/customer/customer_002/semantic", "thinkpad", 5)
            .await
            .unwrap();
        assert!(other_actor.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_truncates_to_top_k() {
        let service = InMemoryMemoryService::new();
        let memory = service.create_memory_and_wait(request()).await.unwrap();
        for i in 0..5 {
            service
                .create_event(&memory.id, "a", "s", vec![EventMessage::user(format!("fact {}", i))])
                .await
                .unwrap();
        }

        let records = service
            .retrieve_memories(&memory.id, "support/customer/a/semantic", "fact", 2)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        // Equal scores: newest first.
        assert_eq!(records[0].text(), Some("fact 4"));
    }

    #[tokio::test]
    async fn test_create_event_unknown_memory_fails() {
        let service = InMemoryMemoryService::new();
        let result = service
            .create_event("missing", "a", "s", vec![EventMessage::user("hi")])
            .await;
        assert!(result.is_err());
    }
}
