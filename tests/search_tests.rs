//! Tests for the Tavily-backed web search tool.

use safina::tools::search::{web_search_tool, MAX_RESULTS, SEARCH_ERROR_PREFIX};
use safina::tools::{SearchCapability, TavilyClient, ToolArguments};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn hits(n: usize) -> serde_json::Value {
    let results: Vec<_> = (1..=n)
        .map(|i| {
            json!({
                "title": format!("Result {i}"),
                "url": format!("https://example.com/{i}"),
                "content": format!("Snippet {i}"),
                "score": 0.9
            })
        })
        .collect();
    json!({"query": "rust", "results": results, "response_time": 0.4})
}

#[tokio::test]
async fn search_sends_query_with_result_cap() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", "Bearer tvly-test"))
        .and(body_partial_json(json!({"query": "rust", "max_results": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(2)))
        .expect(1)
        .mount(&server)
        .await;

    let client = TavilyClient::new("tvly-test".into(), Some(server.uri()));
    let results = client.search("rust").await.expect("search should succeed");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Result 1");
    assert_eq!(results[1].url, "https://example.com/2");
}

#[tokio::test]
async fn search_never_returns_more_than_the_cap() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(8)))
        .mount(&server)
        .await;

    let client = TavilyClient::new("tvly-test".into(), Some(server.uri()));
    let results = client.search("rust").await.unwrap();

    assert_eq!(results.len(), MAX_RESULTS as usize);
}

#[tokio::test]
async fn tool_summarizes_hits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(1)))
        .mount(&server)
        .await;

    let tool = web_search_tool(SearchCapability::Tavily(TavilyClient::new(
        "tvly-test".into(),
        Some(server.uri()),
    )));
    let out = tool
        .execute(&ToolArguments::new(json!({"query": "rust"})))
        .await
        .unwrap();

    assert_eq!(out, "1. Result 1\n   https://example.com/1\n   Snippet 1");
}

#[tokio::test]
async fn tool_turns_provider_failure_into_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let tool = web_search_tool(SearchCapability::Tavily(TavilyClient::new(
        "bad".into(),
        Some(server.uri()),
    )));
    let out = tool
        .execute(&ToolArguments::new(json!({"query": "rust"})))
        .await
        .expect("search failures are reported as output");

    let text = out.as_str().unwrap();
    assert!(text.starts_with(SEARCH_ERROR_PREFIX), "{text}");
    assert!(text.contains("invalid api key"));
}

#[tokio::test]
async fn tool_turns_unreachable_provider_into_text() {
    // Nothing listens on the discard port.
    let tool = web_search_tool(SearchCapability::Tavily(TavilyClient::new(
        "tvly-test".into(),
        Some("http://127.0.0.1:9".into()),
    )));
    let out = tool
        .execute(&ToolArguments::new(json!({"query": "rust"})))
        .await
        .unwrap();

    assert!(out.as_str().unwrap().starts_with(SEARCH_ERROR_PREFIX));
}
