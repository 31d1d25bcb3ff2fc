//! Configuration for logsage.
//!
//! Maps directly to `logsage.toml`. Every field has a default, so an empty
//! file (or no file at all) yields a usable configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsageConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Log truncation tuning.
    #[serde(default)]
    pub truncation: TruncationConfig,
    /// Language-model endpoint settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Prompt template overrides.
    #[serde(default)]
    pub prompt: PromptConfig,
}

impl LogsageConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Reject values that parse but cannot work.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let t = &self.truncation;
        if t.max_chars == 0 {
            return Err(invalid("truncation.max_chars", "must be greater than zero"));
        }
        if t.markers.iter().any(|m| m.trim().is_empty()) {
            return Err(invalid("truncation.markers", "markers must not be empty strings"));
        }

        let l = &self.llm;
        if !(0.0..=2.0).contains(&l.temperature) {
            return Err(invalid(
                "llm.temperature",
                format!("{} is outside 0.0..=2.0", l.temperature),
            ));
        }
        if l.request_timeout_ms == 0 {
            return Err(invalid("llm.request_timeout_ms", "must be greater than zero"));
        }
        if l.max_tokens == 0 {
            return Err(invalid("llm.max_tokens", "must be greater than zero"));
        }
        if l.model.trim().is_empty() {
            return Err(invalid("llm.model", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error. `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// How an oversized log is cut down to fit the model's context window.
///
/// The budget is counted in characters, never bytes, so multi-byte text is
/// never split mid-sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruncationConfig {
    /// Hard upper bound on the excerpt length, in characters.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    /// Lines always kept from the start of the log.
    #[serde(default = "default_head_lines")]
    pub head_lines: usize,
    /// Lines always kept from the end of the log.
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,
    /// Context lines kept on each side of a marker line.
    #[serde(default = "default_keyword_context_lines")]
    pub keyword_context_lines: usize,
    /// At most this many marker windows are kept (the last ones in the log).
    #[serde(default = "default_max_keyword_windows")]
    pub max_keyword_windows: usize,
    /// Case-insensitive substrings that flag a line as diagnostically relevant.
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,
    /// Remove ANSI colour/escape sequences before measuring.
    #[serde(default)]
    pub strip_ansi: bool,
}

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            head_lines: default_head_lines(),
            tail_lines: default_tail_lines(),
            keyword_context_lines: default_keyword_context_lines(),
            max_keyword_windows: default_max_keyword_windows(),
            markers: default_markers(),
            strip_ansi: false,
        }
    }
}

/// Which completion backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-compatible `/v1/chat/completions` API.
    #[default]
    OpenAi,
    /// Ollama `/api/chat`.
    Ollama,
    /// Offline keyword heuristics, no network.
    Mock,
}

impl ProviderKind {
    /// Base URL used when none is configured.
    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com",
            Self::Ollama => "http://localhost:11434",
            Self::Mock => "",
        }
    }

    /// Whether this backend authenticates with an API key.
    #[must_use]
    pub fn needs_credential(self) -> bool {
        matches!(self, Self::OpenAi)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        };
        f.write_str(name)
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            other => Err(format!("unknown provider '{other}' (expected openai, ollama or mock)")),
        }
    }
}

/// Language-model integration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Backend to use.
    #[serde(default)]
    pub provider: ProviderKind,
    /// Base URL for the API; the provider default when unset.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model identifier sent with each request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum completion tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Hard timeout for the completion call in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Treat a missing API key as a fatal configuration error instead of
    /// a recoverable `api_error`.
    #[serde(default)]
    pub require_credentials: bool,
}

impl LlmConfig {
    /// Configured base URL, or the provider default.
    #[must_use]
    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: None,
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_ms: default_timeout_ms(),
            require_credentials: false,
        }
    }
}

/// Prompt template overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Optional TOML prompt template replacing the built-in one.
    #[serde(default)]
    pub template_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }
fn default_max_chars() -> usize { 12_000 }
fn default_head_lines() -> usize { 40 }
fn default_tail_lines() -> usize { 80 }
fn default_keyword_context_lines() -> usize { 3 }
fn default_max_keyword_windows() -> usize { 8 }
fn default_model() -> String { "gpt-3.5-turbo".to_string() }
fn default_api_key_env() -> String { "OPENAI_API_KEY".to_string() }
fn default_temperature() -> f32 { 0.2 }
fn default_max_tokens() -> u32 { 512 }
fn default_timeout_ms() -> u64 { 30_000 }

fn default_markers() -> Vec<String> {
    ["error", "fail", "exception", "timeout", "fatal", "panic", "denied", "traceback"]
        .iter()
        .map(|m| (*m).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = LogsageConfig::from_toml("").expect("empty config parses");
        assert_eq!(config.truncation.max_chars, 12_000);
        assert_eq!(config.llm.provider, ProviderKind::OpenAi);
        assert_eq!(config.llm.effective_base_url(), "https://api.openai.com");
        assert!(!config.llm.require_credentials);
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = LogsageConfig::from_toml(
            r#"
            [truncation]
            max_chars = 500
            markers = ["oom"]

            [llm]
            provider = "ollama"
            model = "llama3"
            "#,
        )
        .expect("parses");
        assert_eq!(config.truncation.max_chars, 500);
        assert_eq!(config.truncation.markers, vec!["oom".to_string()]);
        assert_eq!(config.truncation.head_lines, 40);
        assert_eq!(config.llm.provider, ProviderKind::Ollama);
        assert_eq!(config.llm.effective_base_url(), "http://localhost:11434");
    }

    #[test]
    fn unknown_provider_is_a_parse_error() {
        let err = LogsageConfig::from_toml("[llm]\nprovider = \"bard\"").expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn validate_rejects_zero_budget() {
        let mut config = LogsageConfig::default();
        config.truncation.max_chars = 0;
        let err = config.validate().expect_err("should fail");
        assert!(matches!(err, ConfigError::Invalid { field: "truncation.max_chars", .. }));
    }

    #[test]
    fn validate_rejects_out_of_range_temperature() {
        let mut config = LogsageConfig::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_marker() {
        let mut config = LogsageConfig::default();
        config.truncation.markers.push("  ".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<ProviderKind>(), Ok(ProviderKind::OpenAi));
        assert_eq!("mock".parse::<ProviderKind>(), Ok(ProviderKind::Mock));
        assert!("gemini".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn blank_base_url_falls_back_to_provider_default() {
        let mut llm = LlmConfig::default();
        llm.base_url = Some("  ".into());
        assert_eq!(llm.effective_base_url(), "https://api.openai.com");
        llm.base_url = Some("http://proxy:8080".into());
        assert_eq!(llm.effective_base_url(), "http://proxy:8080");
    }

    #[test]
    fn from_file_reports_missing_file() {
        let err = LogsageConfig::from_file(Path::new("/nonexistent/logsage.toml")).expect_err("should fail");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
