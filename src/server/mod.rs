//! HTTP surface: router, shared state, and CORS policy.

pub mod handlers;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::post;
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::agent::ChatAgent;
use crate::error::SafinaError;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<dyn ChatAgent>,
}

impl AppState {
    pub fn new(agent: Arc<dyn ChatAgent>) -> Self {
        Self { agent }
    }
}

/// CORS for the configured origins, with credentials and any method or
/// header (mirrored back, since wildcards are not allowed with credentials).
///
/// A `*` origin is a configuration error for the same reason.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, SafinaError> {
    let origins = origins
        .iter()
        .map(|origin| {
            if origin.trim() == "*" {
                return Err(SafinaError::Configuration(
                    "wildcard origin is not allowed with credentials".into(),
                ));
            }
            HeaderValue::from_str(origin).map_err(|_| {
                SafinaError::Configuration(format!("invalid CORS origin: {origin}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Build the router with `POST /chat`.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat_handler))
        .layer(cors)
        .with_state(state)
}
