//! # Hook chain
//!
//! Ordered list of [`TurnHook`]s around one agent turn. `on_turn_start` runs first→last so later
//! hooks see earlier rewrites; `on_turn_end` runs last→first. The first hook error stops the phase.

use std::sync::Arc;

use async_trait::async_trait;
use support_core::{Result, Transcript, TurnHook};
use tracing::{info, instrument};

/// Explicit ordered composition of turn hooks.
#[derive(Clone, Default)]
pub struct HookChain {
    hooks: Vec<Arc<dyn TurnHook>>,
}

impl HookChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Appends a hook (start phase in order, end phase in reverse).
    pub fn add_hook(mut self, hook: Arc<dyn TurnHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Runs every hook's `on_turn_start` in insertion order.
    #[instrument(skip(self, transcript))]
    pub async fn run_turn_start(&self, transcript: &mut Transcript) -> Result<()> {
        info!(
            hooks = self.hooks.len(),
            messages = transcript.len(),
            "step: turn start hooks started"
        );
        for hook in &self.hooks {
            let hook_name = std::any::type_name_of_val(hook.as_ref());
            info!(hook = %hook_name, "step: on_turn_start");
            hook.on_turn_start(transcript).await?;
            info!(hook = %hook_name, "step: on_turn_start done");
        }
        Ok(())
    }

    /// Runs every hook's `on_turn_end` in reverse insertion order.
    #[instrument(skip(self, transcript))]
    pub async fn run_turn_end(&self, transcript: &Transcript) -> Result<()> {
        for hook in self.hooks.iter().rev() {
            let hook_name = std::any::type_name_of_val(hook.as_ref());
            info!(hook = %hook_name, "step: on_turn_end");
            hook.on_turn_end(transcript).await?;
            info!(hook = %hook_name, "step: on_turn_end done");
        }
        info!(
            hooks = self.hooks.len(),
            messages = transcript.len(),
            "step: turn end hooks finished"
        );
        Ok(())
    }
}

#[async_trait]
impl TurnHook for HookChain {
    async fn on_turn_start(&self, transcript: &mut Transcript) -> Result<()> {
        self.run_turn_start(transcript).await
    }

    async fn on_turn_end(&self, transcript: &Transcript) -> Result<()> {
        self.run_turn_end(transcript).await
    }
}

// Tests live in tests/hook_chain_test.rs
