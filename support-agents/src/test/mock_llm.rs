//! Scripted LLM client for agent tests: replays queued replies and records every request.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use llm_client::{ChatMessage, LlmClient, LlmReply, ToolSpec};

#[derive(Default)]
pub struct MockLlmClient {
    replies: Mutex<VecDeque<anyhow::Result<LlmReply>>>,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
    pub tool_names: Mutex<Vec<Vec<String>>>,
    pub call_count: AtomicUsize,
}

impl MockLlmClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_text(&self, text: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(LlmReply::Text(text.to_string())));
    }

    pub fn push_reply(&self, reply: LlmReply) {
        self.replies.lock().unwrap().push_back(Ok(reply));
    }

    pub fn push_error(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(anyhow!(message.to_string())));
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn request(&self, index: usize) -> Vec<ChatMessage> {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        tools: &[ToolSpec],
    ) -> anyhow::Result<LlmReply> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(messages);
        self.tool_names
            .lock()
            .unwrap()
            .push(tools.iter().map(|t| t.name.clone()).collect());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("no scripted reply")))
    }
}
