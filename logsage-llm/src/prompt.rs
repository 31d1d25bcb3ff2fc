//! Prompt templates and the prompt builder.
//!
//! Every prompt is a versioned, testable artifact. The built-in template
//! covers the default deployment; a TOML file can replace it per repository
//! (`[prompt] template_file` in `logsage.toml`).

use std::path::Path;

use logsage_core::error::ConfigError;
use logsage_core::types::NormalizedLog;
use serde::Deserialize;

use crate::types::{GenerationSettings, PromptMessage, PromptRequest};

/// System instructions sent with every request.
pub const SYSTEM_INSTRUCTIONS: &str = r"You are an expert DevOps assistant reviewing the log of a failed CI/CD run.

TASK:
- Identify the most likely root cause of the failure.
- Suggest concrete remediation steps, most likely fix first.

Focus on common root causes: failing build or test steps, Terraform plan/apply
errors, missing variables or credentials, permission problems, network
timeouts and application deployment issues.

RULES:
- Be concise and actionable: at most five short bullet points.
- Only cite errors that appear in the log. Never invent file names or messages.
- Your answer is posted as a pull-request comment; use plain Markdown.";

/// User segment wrapping the log excerpt. `{log}` is replaced by the excerpt.
pub const USER_TEMPLATE: &str = r"Analyze the following CI/CD log and suggest how to fix the failure.

```text
{log}
```";

/// Prepended to the user segment when the excerpt is partial.
pub const TRUNCATED_NOTICE: &str = r#"NOTE: this log was truncated before analysis. Terminal escape codes may have been stripped and lines may have been cut to fit the context window; gaps are marked "... [N lines omitted] ...". Do not assume the removed lines were free of errors."#;

/// User segment used when there is no log content at all.
pub const EMPTY_LOG_NOTICE: &str = r"No log content was available for this failed CI/CD run.

Do not guess at specific errors. Instead, give generic troubleshooting guidance
for a failed pipeline job: where to find the full log, how to reproduce the
step locally, and which configuration (secrets, variables, runner image,
dependency versions) to double-check first.";

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

// ---------------------------------------------------------------------------
// PromptTemplate: built-in or loaded from a versioned TOML file
// ---------------------------------------------------------------------------

/// Contents of a TOML prompt file.
#[derive(Debug, Clone, Deserialize)]
struct TomlPromptFile {
    prompt: TomlPromptData,
}

/// Inner `[prompt]` section of a TOML file. Omitted notices fall back to
/// the built-in wording.
#[derive(Debug, Clone, Deserialize)]
struct TomlPromptData {
    version: String,
    system: String,
    #[serde(default = "default_user")]
    user: String,
    #[serde(default = "default_truncated_notice")]
    truncated_notice: String,
    #[serde(default = "default_empty_notice")]
    empty_notice: String,
}

fn default_user() -> String { USER_TEMPLATE.to_string() }
fn default_truncated_notice() -> String { TRUNCATED_NOTICE.to_string() }
fn default_empty_notice() -> String { EMPTY_LOG_NOTICE.to_string() }

/// A loaded, ready-to-render prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Template version string (e.g., "1.0").
    pub version: String,
    /// System instructions.
    pub system: String,
    /// User segment template; contains a `{log}` placeholder.
    pub user: String,
    /// Notice prepended when the log was truncated.
    pub truncated_notice: String,
    /// User segment used when the log is empty.
    pub empty_notice: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptTemplate {
    /// The compiled-in template.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            version: "builtin".into(),
            system: SYSTEM_INSTRUCTIONS.into(),
            user: USER_TEMPLATE.into(),
            truncated_notice: TRUNCATED_NOTICE.into(),
            empty_notice: EMPTY_LOG_NOTICE.into(),
        }
    }

    /// Parse a template from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] if the system instructions are blank or the
    /// user template has no `{log}` placeholder.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let parsed: TomlPromptFile =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let d = parsed.prompt;

        if d.system.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "prompt.system",
                reason: "system instructions must not be empty".into(),
            });
        }
        if !d.user.contains("{log}") {
            return Err(ConfigError::Invalid {
                field: "prompt.user",
                reason: "user template must contain a {log} placeholder".into(),
            });
        }
        if d.truncated_notice.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "prompt.truncated_notice",
                reason: "truncation notice must not be empty".into(),
            });
        }
        if d.empty_notice.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "prompt.empty_notice",
                reason: "empty-log notice must not be empty".into(),
            });
        }

        Ok(Self {
            version: d.version,
            system: d.system,
            user: d.user,
            truncated_notice: d.truncated_notice,
            empty_notice: d.empty_notice,
        })
    }

    /// Load a template from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails
    /// [`PromptTemplate::from_toml`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Assembles a [`PromptRequest`] from a normalized log.
///
/// Pure: no I/O, and the same inputs always give the same request.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: PromptTemplate,
    settings: GenerationSettings,
}

impl PromptBuilder {
    /// Create a builder.
    #[must_use]
    pub fn new(template: PromptTemplate, settings: GenerationSettings) -> Self {
        Self { template, settings }
    }

    /// The template in use.
    #[must_use]
    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Build the request for one log.
    #[must_use]
    pub fn build(&self, log: &NormalizedLog) -> PromptRequest {
        let user = if log.is_blank() {
            self.template.empty_notice.clone()
        } else {
            let body = render_template(&self.template.user, &[("log", log.text())]);
            if log.truncated() {
                format!("{}\n\n{body}", self.template.truncated_notice)
            } else {
                body
            }
        };

        PromptRequest {
            model: self.settings.model.clone(),
            messages: vec![
                PromptMessage::system(self.template.system.clone()),
                PromptMessage::user(user),
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }
}
