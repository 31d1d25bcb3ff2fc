//! Core types for completion requests and responses.

use std::fmt;

use logsage_core::config::LlmConfig;
use serde::{Deserialize, Serialize};

/// Conversation participant role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fixed task instructions.
    System,
    /// The log excerpt (or the empty-log notice).
    User,
}

/// One role-tagged segment of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Who is speaking.
    pub role: Role,
    /// Segment text.
    pub content: String,
}

impl PromptMessage {
    /// A system-role segment.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// A user-role segment.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Model identifier and sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Model identifier.
    pub model: String,
    /// Temperature (0.0 = deterministic).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl GenerationSettings {
    /// Take the generation parameters from the `[llm]` config section.
    #[must_use]
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from_config(&LlmConfig::default())
    }
}

/// A complete request to the language model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptRequest {
    /// Model identifier.
    pub model: String,
    /// Ordered segments: system instructions first, then the user content.
    pub messages: Vec<PromptMessage>,
    /// Temperature.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl PromptRequest {
    /// Content of the first segment with the given role.
    #[must_use]
    pub fn segment(&self, role: Role) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
    }
}

/// Classified outcome of a completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The model returned a completion.
    Success,
    /// Transport, auth, status or payload failure.
    ApiError,
    /// The call did not finish within the timeout.
    Timeout,
    /// Well-formed response without completion text.
    Empty,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::ApiError => "api_error",
            Self::Timeout => "timeout",
            Self::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// What the completion call produced. Exactly one per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiResponse {
    /// Completion text of the first choice, untouched.
    Success {
        /// The generated text.
        text: String,
    },
    /// The service could not be consulted.
    ApiError {
        /// Human-readable cause.
        cause: String,
    },
    /// The call hit its timeout.
    Timeout {
        /// The timeout that elapsed, in milliseconds.
        after_ms: u64,
    },
    /// The response carried no usable completion.
    Empty,
}

impl AiResponse {
    /// Classify the completion field of a well-formed response.
    ///
    /// Missing, empty or whitespace-only text is [`AiResponse::Empty`];
    /// anything else is returned verbatim.
    #[must_use]
    pub fn from_completion(text: Option<&str>) -> Self {
        match text {
            Some(t) if !t.trim().is_empty() => Self::Success { text: t.to_owned() },
            _ => Self::Empty,
        }
    }

    /// The outcome tag.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Success { .. } => Outcome::Success,
            Self::ApiError { .. } => Outcome::ApiError,
            Self::Timeout { .. } => Outcome::Timeout,
            Self::Empty => Outcome::Empty,
        }
    }
}
