//! Memory client facade shared by all agents.
//!
//! Wraps a [`MemoryService`] with the deployment's conventions: one store per deployment whose id
//! lives in run-state, the fixed strategy set, and the failure policy (creation errors propagate,
//! retrieval degrades to empty, event writes log and continue).

use std::collections::BTreeMap;
use std::sync::Arc;

use memory_core::{
    format_namespace, CreateMemoryRequest, Event, EventMessage, MemoryService, MemoryStatus,
};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, instrument, warn};

use crate::config::MemoryConfig;
use crate::error::{MemoryError, Result};
use crate::namespace::ContextScope;
use crate::records::RoutingDecision;
use crate::run_state::ProgressTracker;
use crate::strategies::{
    default_strategies, DEFAULT_EVENT_EXPIRY_DAYS, DEFAULT_MEMORY_DESCRIPTION,
};

/// Snippets per namespace in cross-agent context lookups.
pub const CONTEXT_TOP_K: usize = 2;

/// Session id under which seeded interactions are written.
pub const HISTORICAL_SESSION: &str = "historical_interactions";
/// Session id under which seeded routing decisions are written.
pub const ROUTING_SESSION: &str = "routing_history";

/// Store parameters used on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySettings {
    pub description: String,
    pub event_expiry_days: u32,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            description: DEFAULT_MEMORY_DESCRIPTION.to_string(),
            event_expiry_days: DEFAULT_EVENT_EXPIRY_DAYS,
        }
    }
}

/// Summary of the active store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryStatistics {
    pub memory_id: String,
    pub memory_name: String,
    pub status: MemoryStatus,
    pub strategies: usize,
    pub namespaces: Vec<String>,
}

/// Facade over the memory service for the multi-agent deployment.
pub struct MultiAgentMemoryClient {
    service: Arc<dyn MemoryService>,
    run_state: Mutex<ProgressTracker>,
    memory_id: RwLock<Option<String>>,
    settings: MemorySettings,
}

impl MultiAgentMemoryClient {
    pub fn new(service: Arc<dyn MemoryService>, run_state: ProgressTracker) -> Self {
        Self {
            service,
            run_state: Mutex::new(run_state),
            memory_id: RwLock::new(None),
            settings: MemorySettings::default(),
        }
    }

    /// Client whose run-state file and store parameters come from `config`.
    pub fn from_config(service: Arc<dyn MemoryService>, config: &dyn MemoryConfig) -> Result<Self> {
        let run_state = ProgressTracker::load(config.progress_file())?;
        Ok(Self::new(service, run_state).with_settings(MemorySettings {
            description: config.memory_description().to_string(),
            event_expiry_days: config.event_expiry_days(),
        }))
    }

    pub fn with_settings(mut self, settings: MemorySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn service(&self) -> Arc<dyn MemoryService> {
        self.service.clone()
    }

    /// Active store id: the cached one, else the one recorded in run-state.
    pub async fn memory_id(&self) -> Option<String> {
        if let Some(id) = self.memory_id.read().await.clone() {
            return Some(id);
        }
        let from_state = self.run_state.lock().await.memory_id();
        if let Some(id) = &from_state {
            *self.memory_id.write().await = Some(id.clone());
        }
        from_state
    }

    /// Caches `memory_id` and records it in run-state.
    pub async fn set_memory_id(&self, memory_id: &str) -> Result<()> {
        self.run_state.lock().await.set_memory_id(memory_id)?;
        *self.memory_id.write().await = Some(memory_id.to_string());
        Ok(())
    }

    /// Creates a new store with the fixed strategy set and makes it the active one.
    #[instrument(skip(self))]
    pub async fn create_memory(&self, name: &str) -> Result<String> {
        info!(name = %name, "Creating multi-agent memory");
        let request = CreateMemoryRequest {
            name: name.to_string(),
            description: self.settings.description.clone(),
            strategies: default_strategies(),
            event_expiry_days: self.settings.event_expiry_days,
        };
        let resource = self
            .service
            .create_memory_and_wait(request)
            .await
            .map_err(|e| {
                error!(error = %e, name = %name, "Failed to create multi-agent memory");
                MemoryError::Create(e)
            })?;

        self.set_memory_id(&resource.id).await?;
        info!(memory_id = %resource.id, "Multi-agent memory created");
        Ok(resource.id)
    }

    /// Reuses the known store when the service confirms it, otherwise creates one.
    #[instrument(skip(self))]
    pub async fn create_or_get(&self, name: &str) -> Result<String> {
        if let Some(id) = self.memory_id().await {
            match self.service.get_memory(&id).await {
                Ok(_) => {
                    info!(memory_id = %id, "Using existing memory");
                    return Ok(id);
                }
                Err(e) => {
                    warn!(memory_id = %id, error = %e, "Existing memory ID not valid, creating new memory");
                }
            }
        }
        self.create_memory(name).await
    }

    /// Snippet texts from one namespace of the active store. Empty without a store.
    pub async fn retrieve(&self, namespace: &str, query: &str, top_k: usize) -> Vec<String> {
        match self.memory_id().await {
            Some(id) => self.retrieve_in(&id, namespace, query, top_k).await,
            None => {
                warn!(namespace = %namespace, "No memory ID; skipping retrieval");
                Vec::new()
            }
        }
    }

    /// Snippet texts from one namespace of `memory_id`, at most `top_k`. Errors are logged and
    /// yield an empty list.
    pub async fn retrieve_in(
        &self,
        memory_id: &str,
        namespace: &str,
        query: &str,
        top_k: usize,
    ) -> Vec<String> {
        match self
            .service
            .retrieve_memories(memory_id, namespace, query, top_k)
            .await
        {
            Ok(records) => records
                .iter()
                .filter_map(|r| r.text())
                .take(top_k)
                .map(str::to_string)
                .collect(),
            Err(e) => {
                error!(error = %e, namespace = %namespace, "Failed to retrieve memories");
                Vec::new()
            }
        }
    }

    /// Appends an event to the active store. Returns whether it was written; failures are logged.
    pub async fn create_event(
        &self,
        actor_id: &str,
        session_id: &str,
        messages: Vec<EventMessage>,
    ) -> bool {
        match self.memory_id().await {
            Some(id) => self.create_event_in(&id, actor_id, session_id, messages).await,
            None => {
                warn!(actor_id = %actor_id, "No memory ID; event not saved");
                false
            }
        }
    }

    /// Appends an event to `memory_id`. Returns whether it was written; failures are logged.
    pub async fn create_event_in(
        &self,
        memory_id: &str,
        actor_id: &str,
        session_id: &str,
        messages: Vec<EventMessage>,
    ) -> bool {
        match self
            .service
            .create_event(memory_id, actor_id, session_id, messages)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, actor_id = %actor_id, session_id = %session_id, "Failed to create event");
                false
            }
        }
    }

    /// Appends an event to the active store, propagating every failure.
    pub async fn try_create_event(
        &self,
        actor_id: &str,
        session_id: &str,
        messages: Vec<EventMessage>,
    ) -> Result<Event> {
        let id = self.memory_id().await.ok_or(MemoryError::NotInitialized)?;
        self.service
            .create_event(&id, actor_id, session_id, messages)
            .await
            .map_err(MemoryError::Service)
    }

    /// Writes historical interactions as one event in the historical session.
    pub async fn seed_interactions(
        &self,
        actor_id: &str,
        interactions: Vec<EventMessage>,
    ) -> Result<()> {
        let count = interactions.len();
        self.try_create_event(actor_id, HISTORICAL_SESSION, interactions)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to seed interactions"))?;
        info!(actor_id = %actor_id, count = count, "Seeded interactions");
        Ok(())
    }

    /// Writes one `OTHER` event per routing decision in the routing session.
    pub async fn seed_routing_decisions(
        &self,
        actor_id: &str,
        decisions: &[RoutingDecision],
    ) -> Result<()> {
        for decision in decisions {
            self.try_create_event(
                actor_id,
                ROUTING_SESSION,
                vec![EventMessage::other(decision.to_memory_text())],
            )
            .await
            .inspect_err(|e| error!(error = %e, "Failed to seed routing decisions"))?;
        }
        info!(actor_id = %actor_id, count = decisions.len(), "Seeded routing decisions");
        Ok(())
    }

    /// Context from several agents' namespaces for one actor. Keys are `customer_preferences`,
    /// `customer_semantic`, `orchestrator` and `technical`; each namespace is looked up on its own
    /// so one failure only empties its key. An empty `scopes` means all of them.
    pub async fn get_cross_agent_context(
        &self,
        actor_id: &str,
        query: &str,
        scopes: &[ContextScope],
    ) -> BTreeMap<String, Vec<String>> {
        let mut context = BTreeMap::new();
        let Some(memory_id) = self.memory_id().await else {
            return context;
        };
        let scopes: &[ContextScope] = if scopes.is_empty() {
            &ContextScope::ALL
        } else {
            scopes
        };
        for scope in scopes {
            for (key, template) in scope.entries() {
                let namespace = format_namespace(template, actor_id);
                let snippets = self
                    .retrieve_in(&memory_id, &namespace, query, CONTEXT_TOP_K)
                    .await;
                context.insert(key.to_string(), snippets);
            }
        }
        context
    }

    /// Id, name, status, strategy count and namespace templates of the active store.
    pub async fn get_statistics(&self) -> Result<MemoryStatistics> {
        let id = self.memory_id().await.ok_or(MemoryError::NotInitialized)?;
        let resource = self
            .service
            .get_memory(&id)
            .await
            .map_err(MemoryError::Service)?;
        let strategies = self
            .service
            .get_memory_strategies(&id)
            .await
            .map_err(MemoryError::Service)?;
        Ok(MemoryStatistics {
            memory_id: id,
            memory_name: resource.name,
            status: resource.status,
            strategies: strategies.len(),
            namespaces: strategies
                .into_iter()
                .flat_map(|s| s.namespaces)
                .collect(),
        })
    }

    /// Forgets the active store. The service has no delete; the store expires on its own.
    pub async fn cleanup(&self) -> Result<bool> {
        let Some(id) = self.memory_id().await else {
            warn!("No memory ID to cleanup");
            return Ok(true);
        };
        info!(
            memory_id = %id,
            event_expiry_days = self.settings.event_expiry_days,
            "Memory will expire automatically based on retention policy"
        );
        self.run_state.lock().await.clear_memory_id()?;
        *self.memory_id.write().await = None;
        Ok(true)
    }
}
