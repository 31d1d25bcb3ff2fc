//! Suggestion formatting and output.
//!
//! The model's answer is trimmed and printed as-is. When there is no answer
//! the user gets a fixed fallback naming what went wrong; the underlying
//! cause only ever reaches the diagnostic channel.

use std::io::{self, Write};

use logsage_llm::{AiResponse, Outcome};

use crate::pipeline::RunReport;

/// Printed when the service failed or rejected the request.
pub const API_ERROR_FALLBACK: &str = "AI suggestion unavailable: the AI service returned an error. \
Check the failing step's log for the first error message and fix that first.";

/// Printed when the service did not answer within the timeout.
pub const TIMEOUT_FALLBACK: &str = "AI suggestion unavailable: the AI service did not respond in time. \
Check the failing step's log for the first error message and fix that first.";

/// Printed when the service answered with nothing.
pub const EMPTY_FALLBACK: &str = "AI suggestion unavailable: the AI service returned an empty response. \
Check the failing step's log for the first error message and fix that first.";

/// Characters of the analysed log echoed in verbose diagnostics.
pub const PREVIEW_CHARS: usize = 500;

/// The text handed to the user, with the outcome that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    text: String,
    outcome: Outcome,
}

impl Suggestion {
    /// Suggestion text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Outcome of the completion call.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Whether this is a fixed fallback rather than model output.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.outcome != Outcome::Success
    }
}

/// Turn a completion outcome into user-facing text.
#[must_use]
pub fn format_suggestion(response: &AiResponse) -> Suggestion {
    let (text, outcome) = match response {
        AiResponse::Success { text } if !text.trim().is_empty() => {
            (text.trim().to_owned(), Outcome::Success)
        }
        AiResponse::Success { .. } | AiResponse::Empty => (EMPTY_FALLBACK.to_owned(), Outcome::Empty),
        AiResponse::ApiError { .. } => (API_ERROR_FALLBACK.to_owned(), Outcome::ApiError),
        AiResponse::Timeout { .. } => (TIMEOUT_FALLBACK.to_owned(), Outcome::Timeout),
    };
    Suggestion { text, outcome }
}

/// Write the suggestion to the primary channel.
///
/// Quiet mode writes the text and nothing else, not even a newline.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_suggestion(out: &mut impl Write, suggestion: &Suggestion, quiet: bool) -> io::Result<()> {
    if quiet {
        out.write_all(suggestion.text().as_bytes())?;
    } else {
        writeln!(out, "{}", suggestion.text())?;
    }
    out.flush()
}

/// Write verbose diagnostics for one run.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_diagnostics(err: &mut impl Write, report: &RunReport) -> io::Result<()> {
    writeln!(err, "[logsage] input: {}", report.source)?;
    writeln!(
        err,
        "[logsage] original size: {} bytes, {} chars",
        report.original_bytes, report.original_chars
    )?;
    writeln!(
        err,
        "[logsage] normalized size: {} chars (budget {})",
        report.normalized.char_len(),
        report.budget
    )?;
    match report.normalized.report() {
        Some(truncation) => writeln!(err, "[logsage] truncated: yes ({truncation})")?,
        None => writeln!(err, "[logsage] truncated: no")?,
    }
    writeln!(err, "[logsage] backend: {} (model {})", report.backend, report.model)?;
    match cause(&report.response) {
        Some(cause) => writeln!(
            err,
            "[logsage] outcome: {} ({cause})",
            report.suggestion.outcome()
        )?,
        None => writeln!(err, "[logsage] outcome: {}", report.suggestion.outcome())?,
    }
    writeln!(err, "[logsage] log preview (first {PREVIEW_CHARS} chars):")?;
    writeln!(err, "{}", preview(report.normalized.text()))?;
    err.flush()
}

/// Why the model did not produce a suggestion, if it did not.
#[must_use]
pub fn cause(response: &AiResponse) -> Option<String> {
    match response {
        AiResponse::Success { text } if text.trim().is_empty() => {
            Some("completion was whitespace only".into())
        }
        AiResponse::Success { .. } => None,
        AiResponse::ApiError { cause } => Some(cause.clone()),
        AiResponse::Timeout { after_ms } => Some(format!("no response within {after_ms} ms")),
        AiResponse::Empty => Some("response carried no completion text".into()),
    }
}

/// First [`PREVIEW_CHARS`] characters of `text`.
#[must_use]
pub fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
