//! Generation settings and related enums.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Settings controlling text generation.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
}

impl FinishReason {
    /// Whether the model was cut off before finishing its turn.
    pub fn is_truncated(self) -> bool {
        matches!(self, Self::Length | Self::ContentFilter)
    }
}
