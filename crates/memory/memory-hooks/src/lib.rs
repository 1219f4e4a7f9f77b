//! # memory-hooks
//!
//! [`TurnHook`](support_core::TurnHook) implementations that connect an agent's turns to the
//! shared memory store.
//!
//! - [`AgentMemoryHook`]: before the model runs, prepends labelled snippets from every namespace
//!   the agent may read; after it answers, saves `(user, "[<agent>] response")` as one event.
//! - [`OrchestratorMemoryHook`]: adds routing-decision persistence and lookup.
//! - [`CustomerSupportMemoryHook`]: adds customer preference lookup.
//! - [`KnowledgeBaseMemoryHook`]: adds technical-solution persistence and lookup.
//!
//! Memory failures never fail a turn: they are logged and the turn proceeds unchanged.

mod base;
mod specialized;

pub use base::{AgentMemoryHook, HOOK_TOP_K};
pub use specialized::{
    memory_hook_for, CustomerSupportMemoryHook, KnowledgeBaseMemoryHook, OrchestratorMemoryHook,
};
