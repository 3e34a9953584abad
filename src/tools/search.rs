//! The `web_search` tool, backed by Tavily when a key is configured.
//!
//! Whether search is live or stubbed is decided once at startup and carried
//! in a [`SearchCapability`] value. Both forms expose the same name and
//! schema to the model. The live form never fails the agent loop: provider
//! errors come back as tool output text.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SafinaError;
use crate::provider::http::{bearer_headers, shared_client, status_to_error};
use crate::tools::tool::{AgentTool, Tool};
use crate::tools::types::AgentToolParameters;

pub const WEB_SEARCH_TOOL: &str = "web_search";

/// Result cap sent with every Tavily query.
pub const MAX_RESULTS: u32 = 5;

/// Output of the stub when no Tavily key is configured.
pub const SEARCH_UNAVAILABLE: &str =
    "Search functionality is currently unavailable (Tavily API key not set).";

/// Prefix of the output returned when a Tavily call fails.
pub const SEARCH_ERROR_PREFIX: &str = "Error performing Tavily search:";

const TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Startup decision for the search capability.
#[derive(Debug, Clone)]
pub enum SearchCapability {
    Tavily(TavilyClient),
    Unavailable,
}

impl SearchCapability {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Tavily(_))
    }
}

/// Minimal client for the Tavily search API.
#[derive(Clone)]
pub struct TavilyClient {
    api_key: String,
    base_url: String,
}

impl fmt::Debug for TavilyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TavilyClient")
            .field("api_key", &"..")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Serialize)]
struct TavilySearchRequest<'a> {
    query: &'a str,
    max_results: u32,
}

#[derive(Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// A single search hit.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

impl TavilyClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| TAVILY_BASE_URL.to_string()),
        }
    }

    /// Run a search and return up to [`MAX_RESULTS`] hits.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SafinaError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        debug!(query, "Tavily search");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&TavilySearchRequest {
                query,
                max_results: MAX_RESULTS,
            })
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: TavilySearchResponse = resp.json().await?;
        Ok(data.results.into_iter().take(MAX_RESULTS as usize).collect())
    }
}

/// Render search hits as the text handed back to the model.
pub fn summarize_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for '{query}'.");
    }
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}\n   {}\n   {}", i + 1, r.title, r.url, r.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the `web_search` tool for the given capability.
pub fn web_search_tool(capability: SearchCapability) -> Arc<dyn Tool> {
    let parameters = AgentToolParameters::object()
        .string("query", "The search query", true)
        .build();

    match capability {
        SearchCapability::Tavily(client) => Arc::new(AgentTool::new(
            WEB_SEARCH_TOOL,
            "Perform a web search using Tavily and return relevant snippets.",
            parameters,
            move |args| {
                let client = client.clone();
                async move {
                    let query = args.get_str("query")?;
                    let text = match client.search(query).await {
                        Ok(results) => summarize_results(query, &results),
                        Err(e) => {
                            warn!(error = %e, "Tavily search failed");
                            format!("{SEARCH_ERROR_PREFIX} {e}")
                        }
                    };
                    Ok(serde_json::Value::String(text))
                }
            },
        )),
        SearchCapability::Unavailable => Arc::new(AgentTool::new(
            WEB_SEARCH_TOOL,
            "A placeholder for web search. The Tavily API key is not configured.",
            parameters,
            |_args| async { Ok(serde_json::Value::String(SEARCH_UNAVAILABLE.to_string())) },
        )),
    }
}
