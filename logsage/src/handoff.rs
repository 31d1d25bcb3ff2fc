//! Step output handoff.
//!
//! A later workflow step posts the suggestion as a pull-request comment. It
//! reads it from the runner's `GITHUB_OUTPUT` file, where multi-line values
//! are written as a heredoc:
//!
//! ```text
//! suggestion<<ghadelimiter_6f1c...
//! line one
//! line two
//! ghadelimiter_6f1c...
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use tracing::debug;
use uuid::Uuid;

/// Output name the suggestion is published under.
pub const SUGGESTION_OUTPUT: &str = "suggestion";

/// Append `name=value` to a step output file.
///
/// # Errors
///
/// Fails if the file cannot be opened or written, or if `value` contains
/// the generated delimiter.
pub fn write_step_output(path: &Path, name: &str, value: &str) -> anyhow::Result<()> {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
    if value.contains(&delimiter) {
        bail!("value for step output `{name}` contains its delimiter");
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    write!(file, "{name}<<{delimiter}\n{value}\n{delimiter}\n")
        .with_context(|| format!("failed to write {}", path.display()))?;

    debug!(path = %path.display(), name, "step output written");
    Ok(())
}
