//! # support-core
//!
//! Core types shared by every support agent: [`AgentType`], the message [`Transcript`] an agent
//! works on, the [`TurnHook`] interface memory hooks implement, errors, and tracing initialization.
//! Transport-agnostic; used by hook-chain, memory-hooks, support-agents and support-runtime.

pub mod agent;
pub mod error;
pub mod logger;
pub mod types;

pub use agent::AgentType;
pub use error::{HookError, Result, SupportError};
pub use logger::init_tracing;
pub use types::{ContentBlock, Message, Role, Transcript, TurnHook};
