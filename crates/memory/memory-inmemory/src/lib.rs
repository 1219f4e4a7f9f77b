//! # In-memory memory service
//!
//! [`InMemoryMemoryService`] implements [`memory_core::MemoryService`] inside the process, for
//! development, tests and single-host deployments.
//!
//! ## Extraction
//!
//! When an event is written, every strategy of the store decides which messages become records in
//! its namespaces (templates instantiated for the event's actor):
//!
//! - `SEMANTIC`: every non-empty message.
//! - `USER_PREFERENCE`: user messages that state a preference ("i prefer", "i like", "i need",
//!   "looking for", ...).
//! - `CUSTOM`: messages containing the strategy's extraction marker (case-insensitive).
//!
//! ## Retrieval
//!
//! Records of one namespace are ranked by query term overlap, then recency, and cut to `top_k`.
//!
//! ## Snapshot
//!
//! With [`InMemoryMemoryService::with_snapshot`] the JSON file is the store. Every call reloads
//! it under an advisory lock on `<path>.lock` (shared for reads, exclusive for writes), so agent
//! runtimes and CLI invocations in separate processes read and write one store without losing
//! each other's events.

mod extract;
mod service;

pub use service::InMemoryMemoryService;
