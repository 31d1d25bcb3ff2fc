//! Log source resolution.
//!
//! The caller supplies exactly one of a file path or an inline string.
//! Anything else is rejected up front rather than guessed around.

use std::path::Path;

use tracing::debug;

use crate::error::SourceError;
use crate::types::{LogPayload, SourceKind};

/// Resolve the raw log text from the invocation inputs.
///
/// File contents are decoded as lossy UTF-8: CI runners routinely emit
/// stray non-UTF-8 bytes and those must not make the log unreadable.
///
/// # Errors
///
/// - [`SourceError::AmbiguousInput`] if both inputs are given.
/// - [`SourceError::NoInput`] if neither is given.
/// - [`SourceError::SourceUnavailable`] if the file cannot be read.
pub fn resolve(file: Option<&Path>, inline: Option<&str>) -> Result<LogPayload, SourceError> {
    match (file, inline) {
        (Some(_), Some(_)) => Err(SourceError::AmbiguousInput),
        (None, None) => Err(SourceError::NoInput),
        (Some(path), None) => read_file(path),
        (None, Some(text)) => {
            debug!(chars = text.chars().count(), "using inline log string");
            Ok(LogPayload::new(text.to_owned(), SourceKind::Inline))
        }
    }
}

fn read_file(path: &Path) -> Result<LogPayload, SourceError> {
    let bytes = std::fs::read(path).map_err(|source| SourceError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read log file");

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    };
    Ok(LogPayload::new(text, SourceKind::File(path.to_path_buf())))
}
