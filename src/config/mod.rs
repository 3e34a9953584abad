//! Startup configuration read from the environment (and `.env`).

use std::fmt;

use crate::agent::DEFAULT_MAX_ITERATIONS;
use crate::error::SafinaError;
use crate::provider::google::DEFAULT_MODEL;
use crate::tools::search::{SearchCapability, TavilyClient};
use crate::types::GenerationSettings;

pub const DEFAULT_CORS_ORIGINS: &[&str] = &["https://safina-aichat.onrender.com"];

/// Process-wide configuration, fixed at startup.
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub google_api_key: String,
    pub google_base_url: Option<String>,
    pub tavily_api_key: Option<String>,
    pub tavily_base_url: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub max_iterations: usize,
    pub cors_origins: Vec<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("google_api_key", &"..")
            .field("google_base_url", &self.google_base_url)
            .field("tavily_api_key", &self.tavily_api_key.as_ref().map(|_| ".."))
            .field("tavily_base_url", &self.tavily_base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_iterations", &self.max_iterations)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

impl AppConfig {
    /// Load from process environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self, SafinaError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SafinaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let google_api_key = get("GOOGLE_API_KEY")
            .or_else(|| get("GEMINI_API_KEY"))
            .ok_or_else(|| {
                SafinaError::Configuration("GOOGLE_API_KEY not found in environment or .env file".into())
            })?;

        let temperature = match get("SAFINA_TEMPERATURE") {
            Some(raw) => match raw.parse::<f64>() {
                Ok(t) if t.is_finite() && t >= 0.0 => t,
                _ => {
                    return Err(SafinaError::Configuration(format!(
                        "SAFINA_TEMPERATURE must be a finite number >= 0: {raw}"
                    )))
                }
            },
            None => 0.0,
        };

        let max_tokens = match get("SAFINA_MAX_TOKENS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(SafinaError::Configuration(format!(
                        "SAFINA_MAX_TOKENS must be a positive integer: {raw}"
                    )))
                }
            },
            None => None,
        };

        let max_iterations = match get("SAFINA_MAX_ITERATIONS") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(SafinaError::Configuration(format!(
                        "SAFINA_MAX_ITERATIONS must be a positive integer: {raw}"
                    )))
                }
            },
            None => DEFAULT_MAX_ITERATIONS,
        };

        let cors_origins = match get("SAFINA_CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            google_api_key,
            google_base_url: get("GOOGLE_BASE_URL"),
            tavily_api_key: get("TAVILY_API_KEY"),
            tavily_base_url: get("TAVILY_BASE_URL"),
            model: get("SAFINA_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            max_tokens,
            max_iterations,
            cors_origins,
        })
    }

    /// Decide once whether web search is live or stubbed.
    pub fn search_capability(&self) -> SearchCapability {
        match &self.tavily_api_key {
            Some(key) => SearchCapability::Tavily(TavilyClient::new(
                key.clone(),
                self.tavily_base_url.clone(),
            )),
            None => SearchCapability::Unavailable,
        }
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings::builder()
            .temperature(self.temperature)
            .maybe_max_tokens(self.max_tokens)
            .build()
    }
}
