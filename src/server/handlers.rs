//! HTTP handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, instrument, warn};

use super::AppState;
use crate::chat::{self, ChatRequest};
use crate::error::SafinaError;

/// Error body, `{"detail": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorBody { detail })).into_response()
}

/// Failure inside the chat exchange, reported as a 500.
#[derive(Debug)]
pub struct ApiError(pub SafinaError);

impl From<SafinaError> for ApiError {
    fn from(err: SafinaError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Error during chat processing");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal server error: {}", self.0),
        )
    }
}

/// POST /chat — run the agent over the supplied history plus the new message.
///
/// Body validation failures keep the extractor's client-error status and
/// never reach the agent.
#[instrument(skip_all)]
pub async fn chat_handler(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(status = %rejection.status(), "Rejected chat request: {}", rejection.body_text());
            return error_response(rejection.status(), rejection.body_text());
        }
    };

    match chat::respond(state.agent.as_ref(), request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
