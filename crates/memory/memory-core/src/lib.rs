//! # memory-core
//!
//! The boundary to the hosted conversational-memory service.
//!
//! - [`MemoryService`]: create-and-wait, lookup, strategy listing, namespace retrieval and
//!   append-only event writes. Every method returns `anyhow::Result`; callers decide whether an
//!   error is fatal (store creation) or degraded (retrieval, event writes).
//! - Types: [`MemoryStrategy`] and [`StrategyType`] (how events are extracted into namespaces),
//!   [`EventMessage`] / [`EventRole`] (one turn record), [`MemoryRecord`] (a retrieved snippet).
//!
//! Namespace templates use the `{actorId}` placeholder; see [`format_namespace`].

mod service;
mod types;

pub use service::MemoryService;
pub use types::{
    format_namespace, CreateMemoryRequest, Event, EventMessage, EventRole, MemoryContent,
    MemoryRecord, MemoryResource, MemoryStatus, MemoryStrategy, StrategyType, ACTOR_PLACEHOLDER,
};
