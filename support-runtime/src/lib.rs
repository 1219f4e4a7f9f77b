//! # Support runtime
//!
//! Serves one support agent over HTTP. Two wire profiles:
//!
//! | Profile | Route | Request | Response |
//! |---------|-------|---------|----------|
//! | `http` | `POST /invocations` | `{"prompt": "..."}` | reply as a JSON string |
//! | `a2a` | `POST /` | JSON-RPC 2.0 `message/send` | task with the reply in `artifacts[0].parts[0].text` |
//!
//! Both expose `GET /ping`. [`A2aAgentClient`] is the calling side of the `a2a` profile and lets
//! an orchestrator use remote specialists as ordinary [`AgentHandle`](support_agents::AgentHandle)s.

pub mod a2a;
pub mod client;
pub mod components;
pub mod config;
pub mod error;
pub mod http;
pub mod runner;

pub use client::A2aAgentClient;
pub use components::{
    build_agent, build_memory, build_orchestrator, build_support_agent, open_memory_client,
    try_build_memory, MemoryComponents,
};
pub use config::{Protocol, RuntimeConfig};
pub use error::{Result, RuntimeError};
pub use runner::{build_router, run_runtime, serve};
