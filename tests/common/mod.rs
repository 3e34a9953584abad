//! Shared test helpers: a scripted model provider and a counting agent.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use safina::agent::ChatAgent;
use safina::error::SafinaError;
use safina::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use safina::types::*;

/// A mock provider that returns queued responses and records every request.
pub struct MockProvider {
    model_id: String,
    responses: Mutex<VecDeque<Result<ProviderResponse, SafinaError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a final text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push_back(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a tool call response.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.responses.lock().unwrap().push_back(Ok(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: vec![ToolCall::new(id, name, args)],
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    /// Queue a provider failure.
    pub fn queue_error(&self, error: SafinaError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, SafinaError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ProviderResponse {
                    text: "Mock response".to_string(),
                    finish_reason: Some(FinishReason::Stop),
                    ..Default::default()
                })
            })
    }
}

/// Agent double that appends a fixed reply and counts invocations.
pub struct EchoAgent {
    pub reply: Option<String>,
    pub fail_with: Option<String>,
    calls: AtomicUsize,
}

impl EchoAgent {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns the conversation untouched, so there is no answer to extract.
    pub fn silent() -> Self {
        Self {
            reply: None,
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: None,
            fail_with: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatAgent for EchoAgent {
    async fn run(
        &self,
        mut messages: Vec<ConversationMessage>,
    ) -> Result<Vec<ConversationMessage>, SafinaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.fail_with {
            return Err(SafinaError::api(503, message.clone()));
        }
        if let Some(reply) = &self.reply {
            messages.push(ConversationMessage::assistant(reply.clone()));
        }
        Ok(messages)
    }
}
