//! Google Gemini API provider.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::SafinaError;
use crate::types::*;

use super::http::{shared_client, status_to_error};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

pub struct GoogleProvider {
    model_id: String,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GoogleProvider {
    pub fn new(model_id: impl Into<String>, api_key: String, base_url: Option<String>) -> Self {
        Self {
            model_id: model_id.into(),
            api_key,
            base_url: base_url.unwrap_or_else(|| BASE_URL.to_string()),
        }
    }

    /// Build the `generateContent` body.
    ///
    /// Consecutive tool results are grouped into one `function` turn, and each
    /// `functionResponse` is named after the call it answers. A result with no
    /// matching call is an error.
    ///
    /// Gemini requires every `functionCall` to be answered by the next turn,
    /// so calls that no later tool result answers are left out. This is what
    /// replayed client history looks like, since tool output comes back
    /// flattened into plain bot turns. Empty text parts are skipped, and a
    /// turn left with no parts is dropped.
    pub fn build_request_body(&self, request: &ProviderRequest) -> Result<Value, SafinaError> {
        let mut contents: Vec<Value> = Vec::new();
        let mut pending_responses: Vec<Value> = Vec::new();

        for (idx, msg) in request.messages.iter().enumerate() {
            if let ConversationMessage::ToolResult {
                tool_call_id,
                content,
            } = msg
            {
                let call = find_call(&request.messages[..idx], tool_call_id).ok_or_else(|| {
                    SafinaError::InvalidState(format!(
                        "tool result '{tool_call_id}' has no matching tool call"
                    ))
                })?;
                pending_responses.push(json!({
                    "functionResponse": {
                        "name": call.name,
                        "response": { "result": content },
                    }
                }));
                continue;
            }

            flush_function_turn(&mut contents, &mut pending_responses);

            let (role, parts) = match msg {
                ConversationMessage::Human { content } => ("user", text_parts(content)),
                ConversationMessage::Assistant {
                    content,
                    tool_calls,
                } => {
                    let later = &request.messages[idx + 1..];
                    let mut parts = text_parts(content);
                    for tc in tool_calls.iter().filter(|tc| is_answered(later, &tc.id)) {
                        parts.push(json!({
                            "functionCall": {
                                "name": tc.name,
                                "args": tc.args,
                            }
                        }));
                    }
                    ("model", parts)
                }
                ConversationMessage::ToolResult { .. } => continue,
            };

            if !parts.is_empty() {
                contents.push(json!({
                    "role": role,
                    "parts": parts,
                }));
            }
        }
        flush_function_turn(&mut contents, &mut pending_responses);

        let mut body = serde_json::Map::new();
        body.insert("contents".into(), Value::Array(contents));

        let mut gen_config = serde_json::Map::new();
        if let Some(max) = request.settings.max_tokens {
            gen_config.insert("maxOutputTokens".into(), max.into());
        }
        if let Some(temp) = request.settings.temperature {
            gen_config.insert("temperature".into(), temp.into());
        }
        if !gen_config.is_empty() {
            body.insert("generationConfig".into(), Value::Object(gen_config));
        }

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let fn_decls: Vec<Value> = tools
                    .iter()
                    .map(|t| {
                        json!({
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        })
                    })
                    .collect();
                body.insert("tools".into(), json!([{"functionDeclarations": fn_decls}]));
            }
        }

        Ok(Value::Object(body))
    }
}

fn text_parts(content: &str) -> Vec<Value> {
    if content.is_empty() {
        Vec::new()
    } else {
        vec![json!({"text": content})]
    }
}

fn is_answered(later: &[ConversationMessage], tool_call_id: &str) -> bool {
    later.iter().any(|m| {
        matches!(m, ConversationMessage::ToolResult { tool_call_id: id, .. } if id == tool_call_id)
    })
}

fn flush_function_turn(contents: &mut Vec<Value>, pending: &mut Vec<Value>) {
    if pending.is_empty() {
        return;
    }
    contents.push(json!({
        "role": "function",
        "parts": std::mem::take(pending),
    }));
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, SafinaError> {
        let body = self.build_request_body(request)?;
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model_id
        );

        debug!(model = %self.model_id, messages = request.messages.len(), "Google generate_text");

        let resp = shared_client()
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: GeminiResponse = resp.json().await?;
        parse_response(data)
    }
}

fn parse_response(data: GeminiResponse) -> Result<ProviderResponse, SafinaError> {
    let candidate = data
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| SafinaError::api(200, "No candidates in Gemini response"))?;

    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for part in candidate.content.parts {
        if let Some(t) = part.text {
            text.push_str(&t);
        }
        if let Some(fc) = part.function_call {
            tool_calls.push(ToolCall::new(
                uuid::Uuid::new_v4().to_string(),
                fc.name,
                fc.args.unwrap_or_else(|| Value::Object(Default::default())),
            ));
        }
    }

    let finish_reason = if !tool_calls.is_empty() {
        Some(FinishReason::ToolCalls)
    } else {
        match candidate.finish_reason.as_deref() {
            Some("STOP") => Some(FinishReason::Stop),
            Some("MAX_TOKENS") => Some(FinishReason::Length),
            Some("SAFETY") | Some("RECITATION") => Some(FinishReason::ContentFilter),
            _ => None,
        }
    };

    let usage = data
        .usage_metadata
        .map(|u| Usage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        })
        .unwrap_or_default();

    Ok(ProviderResponse {
        text,
        usage,
        tool_calls,
        finish_reason,
    })
}

// Internal Gemini response types

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    name: String,
    args: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}
