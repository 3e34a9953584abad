//! Safina — a chat agent gateway.
//!
//! Exposes one HTTP endpoint, `POST /chat`, that forwards a user message and
//! the client-held conversation history to a Gemini agent with an optional
//! web-search tool, then returns the agent's reply and the updated transcript.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use safina::agent::AgentRunner;
//! use safina::config::AppConfig;
//! use safina::provider::GoogleProvider;
//! use safina::server::{cors_layer, router, AppState};
//! use safina::tools::ToolRegistry;
//!
//! # async fn example() -> safina::error::Result<()> {
//! let config = AppConfig::from_env()?;
//! let provider = GoogleProvider::new(config.model.clone(), config.google_api_key.clone(), None);
//! let agent = AgentRunner::new(Arc::new(provider), ToolRegistry::new(config.search_capability()));
//! let app = router(AppState::new(Arc::new(agent)), cors_layer(&config.cors_origins)?);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod server;
pub mod tools;
pub mod types;
