//! Shared HTTP client and status mapping.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::SafinaError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            })
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> SafinaError {
    match status {
        401 | 403 => SafinaError::Authentication(body.to_string()),
        429 => SafinaError::RateLimited(body.to_string()),
        _ => SafinaError::api(status, body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(status_to_error(401, "no"), SafinaError::Authentication(_)));
        assert!(matches!(status_to_error(403, "no"), SafinaError::Authentication(_)));
        assert!(matches!(status_to_error(429, "quota"), SafinaError::RateLimited(_)));
        assert!(matches!(
            status_to_error(500, "boom"),
            SafinaError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn bearer_headers_carry_token() {
        let headers = bearer_headers("tvly-123");
        assert_eq!(headers[AUTHORIZATION], "Bearer tvly-123");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }
}
