//! One invocation, end to end: resolve, normalize, prompt, complete, format.

use std::path::Path;

use logsage_core::config::LogsageConfig;
use logsage_core::error::{ConfigError, SourceError};
use logsage_core::normalize::Normalizer;
use logsage_core::source;
use logsage_core::types::{LogPayload, NormalizedLog, SourceKind};
use logsage_llm::prompt::{PromptBuilder, PromptTemplate};
use logsage_llm::{AiResponse, CompletionClient, GenerationSettings, build_client};
use thiserror::Error;
use tracing::{debug, info};

use crate::format::{self, Suggestion};

/// Failures that stop an invocation. Every AI outcome is recoverable and
/// never ends up here.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The log could not be resolved.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Configuration or prompt template problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The step output file could not be written.
    #[error("failed to write step output: {0:#}")]
    Handoff(anyhow::Error),

    /// Writing to stdout or stderr failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl PipelineError {
    /// Process exit status for this failure.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Source(SourceError::NoInput | SourceError::AmbiguousInput) => 2,
            Self::Source(SourceError::SourceUnavailable { .. }) => 3,
            Self::Config(_) => 4,
            Self::Handoff(_) => 5,
            Self::Output(_) => 1,
        }
    }
}

/// Everything one run produced, for output and diagnostics.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Where the log came from.
    pub source: SourceKind,
    /// Raw log size in bytes.
    pub original_bytes: usize,
    /// Raw log size in characters.
    pub original_chars: usize,
    /// Character budget the excerpt was held to.
    pub budget: usize,
    /// The excerpt sent to the model.
    pub normalized: NormalizedLog,
    /// Completion backend name.
    pub backend: String,
    /// Model identifier.
    pub model: String,
    /// Raw completion outcome.
    pub response: AiResponse,
    /// Text shown to the user.
    pub suggestion: Suggestion,
}

/// The assembled pipeline. Built once per invocation.
pub struct Pipeline {
    normalizer: Normalizer,
    prompts: PromptBuilder,
    client: Box<dyn CompletionClient>,
}

impl Pipeline {
    /// Assemble a pipeline from parts.
    #[must_use]
    pub fn new(normalizer: Normalizer, prompts: PromptBuilder, client: Box<dyn CompletionClient>) -> Self {
        Self {
            normalizer,
            prompts,
            client,
        }
    }

    /// Assemble the pipeline described by `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the prompt template file cannot be
    /// loaded, or if a required credential is missing.
    pub fn from_config(config: &LogsageConfig, api_key: Option<String>) -> Result<Self, ConfigError> {
        let template = match config
            .prompt
            .template_file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
        {
            Some(path) => PromptTemplate::from_file(path)?,
            None => PromptTemplate::builtin(),
        };
        debug!(version = %template.version, "prompt template loaded");

        let client = build_client(&config.llm, api_key)?;
        Ok(Self::new(
            Normalizer::new(config.truncation.clone()),
            PromptBuilder::new(template, GenerationSettings::from_config(&config.llm)),
            client,
        ))
    }

    /// Resolve the log from the invocation inputs and analyse it.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the inputs do not name exactly one
    /// readable log. Nothing is sent to the model in that case.
    pub async fn run(&self, file: Option<&Path>, inline: Option<&str>) -> Result<RunReport, SourceError> {
        let payload = source::resolve(file, inline)?;
        Ok(self.analyze(&payload).await)
    }

    /// Analyse an already resolved log. Always produces a suggestion.
    pub async fn analyze(&self, payload: &LogPayload) -> RunReport {
        let normalized = self.normalizer.normalize(payload);
        info!(
            source = payload.source().label(),
            original_chars = payload.char_len(),
            normalized_chars = normalized.char_len(),
            truncated = normalized.truncated(),
            "log normalized"
        );

        let request = self.prompts.build(&normalized);
        let response = self.client.complete(&request).await;
        let suggestion = format::format_suggestion(&response);

        RunReport {
            source: payload.source().clone(),
            original_bytes: payload.byte_len(),
            original_chars: payload.char_len(),
            budget: self.normalizer.budget(),
            normalized,
            backend: self.client.name().to_owned(),
            model: request.model,
            response,
            suggestion,
        }
    }
}
