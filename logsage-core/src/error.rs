//! Error types for log acquisition and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while resolving the log to analyse.
///
/// All variants are fatal to an invocation: the pipeline never guesses
/// which input the caller meant.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Neither a log file nor a log string was supplied.
    #[error("no log input supplied: pass exactly one of --log-file or --log-string")]
    NoInput,

    /// Both a log file and a log string were supplied.
    #[error("ambiguous log input: both --log-file and --log-string were supplied")]
    AmbiguousInput,

    /// The log file could not be read.
    #[error("log source unavailable: {}: {source}", path.display())]
    SourceUnavailable {
        /// Path the caller supplied.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Failures while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {}: {source}", path.display())]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The TOML could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(String),

    /// A value parsed but is out of range.
    #[error("invalid configuration value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The provider needs a credential and the run requires one.
    #[error("missing credential: environment variable {env_var} is not set")]
    MissingCredential {
        /// Environment variable that was expected to hold the key.
        env_var: String,
    },
}

/// Convenience Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;
