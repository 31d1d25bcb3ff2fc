//! Logging setup using `tracing-subscriber`.
//!
//! Logs always go to stderr so stdout carries nothing but the suggestion.

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// `RUST_LOG` wins over `level`. Quiet mode turns logging off entirely.
/// Calling this twice is harmless; the second call is ignored.
pub fn init(level: &str, quiet: bool) {
    let env_filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
