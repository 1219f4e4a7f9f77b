//! The memory service trait.

use async_trait::async_trait;

use crate::types::{
    CreateMemoryRequest, Event, EventMessage, MemoryRecord, MemoryResource, MemoryStrategy,
};

/// Conversational-memory service: one store holds events for many actors and sessions, and its
/// strategies extract them into namespaces that can be searched by query.
#[async_trait]
pub trait MemoryService: Send + Sync {
    /// Creates a store with the given strategies and waits until it is usable.
    async fn create_memory_and_wait(
        &self,
        request: CreateMemoryRequest,
    ) -> Result<MemoryResource, anyhow::Error>;

    /// Looks up a store by id. Errors when the id is unknown.
    async fn get_memory(&self, memory_id: &str) -> Result<MemoryResource, anyhow::Error>;

    /// Strategies of a store, with their namespace templates.
    async fn get_memory_strategies(
        &self,
        memory_id: &str,
    ) -> Result<Vec<MemoryStrategy>, anyhow::Error>;

    /// Up to `top_k` records from one concrete namespace, most relevant first.
    async fn retrieve_memories(
        &self,
        memory_id: &str,
        namespace: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<MemoryRecord>, anyhow::Error>;

    /// Appends one write-once event for (actor, session).
    async fn create_event(
        &self,
        memory_id: &str,
        actor_id: &str,
        session_id: &str,
        messages: Vec<EventMessage>,
    ) -> Result<Event, anyhow::Error>;
}
