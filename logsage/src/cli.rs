//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use logsage_core::config::{LogsageConfig, ProviderKind};
use logsage_core::error::ConfigError;
use tracing::debug;

/// Suggest a fix for a failed CI/CD job from its log.
///
/// Pass exactly one of `--log-file` or `--log-string`.
#[derive(Debug, Parser)]
#[command(name = "logsage", version, about)]
pub struct Cli {
    /// Path to the job log.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log text passed inline.
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true)]
    pub log_string: Option<String>,

    /// Print only the suggestion, with no diagnostics and no logging.
    #[arg(short, long)]
    pub quiet: bool,

    /// TOML configuration file.
    #[arg(long, env = "LOGSAGE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Completion backend: openai, ollama or mock.
    #[arg(long, value_name = "NAME")]
    pub provider: Option<ProviderKind>,

    /// Model identifier.
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the completion endpoint.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Completion timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Character budget for the log excerpt.
    #[arg(long, value_name = "CHARS")]
    pub max_chars: Option<usize>,

    /// Step output file; the suggestion is appended as `suggestion`.
    #[arg(long, env = "GITHUB_OUTPUT", value_name = "PATH")]
    pub github_output: Option<PathBuf>,
}

impl Cli {
    /// Load the configuration file (or defaults), apply command-line
    /// overrides and validate the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// the merged configuration is invalid.
    pub fn load_config(&self) -> Result<LogsageConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration");
                LogsageConfig::from_file(path)?
            }
            None => LogsageConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Flags win over the configuration file.
    pub fn apply_overrides(&self, config: &mut LogsageConfig) {
        if let Some(provider) = self.provider {
            config.llm.provider = provider;
        }
        if let Some(model) = &self.model {
            config.llm.model.clone_from(model);
        }
        if let Some(url) = &self.base_url {
            config.llm.base_url = Some(url.clone());
        }
        if let Some(ms) = self.timeout_ms {
            config.llm.request_timeout_ms = ms;
        }
        if let Some(chars) = self.max_chars {
            config.truncation.max_chars = chars;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("logsage").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn both_inputs_parse_and_are_left_to_the_adapter() {
        let cli = parse(&["--log-file", "job.log", "--log-string", "boom"]);
        assert!(cli.log_file.is_some());
        assert_eq!(cli.log_string.as_deref(), Some("boom"));
    }

    #[test]
    fn inline_log_may_start_with_a_dash() {
        let cli = parse(&["--log-string", "--- FAIL: TestLogin (0.02s)"]);
        assert_eq!(cli.log_string.as_deref(), Some("--- FAIL: TestLogin (0.02s)"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = Cli::try_parse_from(["logsage", "--provider", "bard"]).expect_err("should fail");
        assert!(err.to_string().contains("unknown provider"));
    }

    #[test]
    fn overrides_win_over_defaults() {
        let cli = parse(&[
            "--provider",
            "Ollama",
            "--model",
            "llama3.1:8b",
            "--timeout-ms",
            "5000",
            "--max-chars",
            "4000",
        ]);
        let mut config = LogsageConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.llm.provider, ProviderKind::Ollama);
        assert_eq!(config.llm.model, "llama3.1:8b");
        assert_eq!(config.llm.request_timeout_ms, 5000);
        assert_eq!(config.truncation.max_chars, 4000);
        assert_eq!(config.llm.effective_base_url(), "http://localhost:11434");
    }

    #[test]
    fn config_file_is_merged_then_validated() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[truncation]\nmax_chars = 8000\n\n[llm]\nmodel = \"gpt-4o-mini\"")
            .expect("write config");

        let path = file.path().to_string_lossy().into_owned();
        let config = parse(&["--config", &path]).load_config().expect("loads");
        assert_eq!(config.truncation.max_chars, 8000);
        assert_eq!(config.llm.model, "gpt-4o-mini");

        let err = parse(&["--config", &path, "--max-chars", "0"])
            .load_config()
            .expect_err("should fail");
        assert!(matches!(err, ConfigError::Invalid { field: "truncation.max_chars", .. }));
    }
}
