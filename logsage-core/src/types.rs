//! Core data types flowing through the pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

/// Where the raw log text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Read from a file on disk.
    File(PathBuf),
    /// Passed inline on the command line.
    Inline,
}

impl SourceKind {
    /// Short label used in diagnostics (`file` or `inline-string`).
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Inline => "inline-string",
        }
    }

    /// Path of the log file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Inline => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file ({})", path.display()),
            Self::Inline => f.write_str("inline-string"),
        }
    }
}

/// Raw log text exactly as resolved from its source.
#[derive(Debug, Clone)]
pub struct LogPayload {
    text: String,
    source: SourceKind,
    byte_len: usize,
    char_len: usize,
}

impl LogPayload {
    /// Wrap resolved text, recording its original size.
    #[must_use]
    pub fn new(text: String, source: SourceKind) -> Self {
        let byte_len = text.len();
        let char_len = text.chars().count();
        Self {
            text,
            source,
            byte_len,
            char_len,
        }
    }

    /// Raw text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Where the text came from.
    #[must_use]
    pub fn source(&self) -> &SourceKind {
        &self.source
    }

    /// Original length in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Original length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.char_len
    }
}

/// A line that matched an error-indicative marker and earned a context window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHit {
    /// 1-based line number in the original text.
    pub line: usize,
    /// The marker that matched (lowercased).
    pub marker: String,
}

/// Which steps removed content from a log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncationReport {
    /// Character count before truncation.
    pub original_chars: usize,
    /// Lines kept from the start.
    pub head_lines: usize,
    /// Lines kept from the end.
    pub tail_lines: usize,
    /// Marker lines kept together with their surrounding context.
    pub keyword_windows: Vec<KeywordHit>,
    /// Lines replaced by omission markers.
    pub omitted_lines: usize,
    /// Whether the stitched excerpt still overflowed and was hard-cut.
    pub hard_cut: bool,
    /// Whether terminal escape sequences were removed first.
    pub stripped_ansi: bool,
}

impl TruncationReport {
    /// Names of the strategies that contributed to the excerpt.
    #[must_use]
    pub fn strategies(&self) -> Vec<&'static str> {
        let mut applied = Vec::with_capacity(5);
        if self.stripped_ansi {
            applied.push("ansi-strip");
        }
        if self.head_lines > 0 {
            applied.push("head");
        }
        if self.tail_lines > 0 {
            applied.push("tail");
        }
        if !self.keyword_windows.is_empty() {
            applied.push("keyword-window");
        }
        if self.hard_cut {
            applied.push("hard-cut");
        }
        applied
    }
}

impl fmt::Display for TruncationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "strategies={} head_lines={} tail_lines={} keyword_windows={} omitted_lines={} hard_cut={}",
            self.strategies().join("+"),
            self.head_lines,
            self.tail_lines,
            self.keyword_windows.len(),
            self.omitted_lines,
            self.hard_cut,
        )
    }
}

/// Log text bounded to the configured character budget.
///
/// Only [`crate::Normalizer`] produces these, so the budget invariant holds
/// for every instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLog {
    text: String,
    report: Option<TruncationReport>,
}

impl NormalizedLog {
    pub(crate) fn untouched(text: String) -> Self {
        Self { text, report: None }
    }

    pub(crate) fn truncated_with(text: String, report: TruncationReport) -> Self {
        Self {
            text,
            report: Some(report),
        }
    }

    /// Bounded text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether any part of the original text was dropped.
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.report.is_some()
    }

    /// Details of the truncation, present only when [`Self::truncated`].
    #[must_use]
    pub fn report(&self) -> Option<&TruncationReport> {
        self.report.as_ref()
    }

    /// Length of the bounded text in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// True when there is no log content worth analysing.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
