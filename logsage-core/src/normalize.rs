//! Size-bounded log normalization.
//!
//! A log that fits the budget passes through untouched. An oversized log is
//! cut down line by line, keeping:
//!
//! 1. the first `head_lines` lines (job setup, tool versions),
//! 2. the last `tail_lines` lines (where the runner reports the failure),
//! 3. a window of `keyword_context_lines` around each of the last
//!    `max_keyword_windows` lines containing a marker such as `error`.
//!
//! Discontinuous runs are joined with an omission line. If the stitched
//! excerpt still overflows, its end is hard-cut at the budget. Every output
//! fits the budget, so normalizing an output again is a no-op.
//!
//! With `strip_ansi` set, escape sequences are removed first. Removing any
//! counts as truncation even when the rest fits the budget.

use std::borrow::Cow;

use regex::Regex;
use tracing::debug;

use crate::config::TruncationConfig;
use crate::types::{KeywordHit, LogPayload, NormalizedLog, TruncationReport};

/// CSI sequences (colours, cursor moves) and OSC sequences (titles, links).
const ANSI_ESCAPE: &str = r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)";

/// Line inserted where a run of lines was dropped.
#[must_use]
pub fn omission_marker(lines: usize) -> String {
    format!("... [{lines} lines omitted] ...")
}

/// Bounds log text to a character budget.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: TruncationConfig,
    markers: Vec<String>,
    ansi: Option<Regex>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(TruncationConfig::default())
    }
}

impl Normalizer {
    /// Build a normalizer from truncation settings.
    #[must_use]
    pub fn new(config: TruncationConfig) -> Self {
        let markers = config
            .markers
            .iter()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        let ansi = if config.strip_ansi {
            Regex::new(ANSI_ESCAPE).ok()
        } else {
            None
        };
        Self {
            config,
            markers,
            ansi,
        }
    }

    /// Character budget this normalizer enforces.
    #[must_use]
    pub fn budget(&self) -> usize {
        self.config.max_chars
    }

    /// Normalize a resolved payload.
    #[must_use]
    pub fn normalize(&self, payload: &LogPayload) -> NormalizedLog {
        self.normalize_text(payload.text())
    }

    /// Normalize raw text.
    #[must_use]
    pub fn normalize_text(&self, raw: &str) -> NormalizedLog {
        let text: Cow<'_, str> = match &self.ansi {
            Some(re) => re.replace_all(raw, ""),
            None => Cow::Borrowed(raw),
        };

        // `replace_all` only allocates when something matched.
        let stripped_ansi = matches!(text, Cow::Owned(_));
        let budget = self.config.max_chars;
        let original_chars = raw.chars().count();
        if text.chars().count() <= budget {
            if !stripped_ansi {
                return NormalizedLog::untouched(text.into_owned());
            }
            let report = TruncationReport {
                original_chars,
                head_lines: 0,
                tail_lines: 0,
                keyword_windows: Vec::new(),
                omitted_lines: 0,
                hard_cut: false,
                stripped_ansi,
            };
            debug!(original_chars, budget, %report, "escape sequences stripped");
            return NormalizedLog::truncated_with(text.into_owned(), report);
        }

        let lines: Vec<&str> = text.lines().collect();
        let selection = self.select(&lines);
        let (stitched, omitted_lines) = stitch(&lines, &selection.keep);

        let (excerpt, hard_cut) = match cut_to_budget(&stitched, budget) {
            Some(cut) => (cut.to_owned(), true),
            None => (stitched, false),
        };

        let report = TruncationReport {
            original_chars,
            head_lines: selection.head,
            tail_lines: selection.tail,
            keyword_windows: selection.hits,
            omitted_lines,
            hard_cut,
            stripped_ansi,
        };
        debug!(
            original_chars,
            budget,
            excerpt_chars = excerpt.chars().count(),
            %report,
            "log truncated"
        );
        NormalizedLog::truncated_with(excerpt, report)
    }

    fn matching_marker(&self, line: &str) -> Option<&str> {
        let lower = line.to_lowercase();
        self.markers
            .iter()
            .find(|m| lower.contains(m.as_str()))
            .map(String::as_str)
    }

    fn select(&self, lines: &[&str]) -> Selection {
        let n = lines.len();
        let mut keep = vec![false; n];

        let head = self.config.head_lines.min(n);
        keep[..head].fill(true);
        let tail = self.config.tail_lines.min(n);
        keep[n - tail..].fill(true);

        let mut hits: Vec<KeywordHit> = lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| {
                self.matching_marker(line).map(|marker| KeywordHit {
                    line: i + 1,
                    marker: marker.to_owned(),
                })
            })
            .collect();
        // Failures surface late in a CI log; prefer the last hits.
        if hits.len() > self.config.max_keyword_windows {
            hits.drain(..hits.len() - self.config.max_keyword_windows);
        }

        let ctx = self.config.keyword_context_lines;
        for hit in &hits {
            let i = hit.line - 1;
            let lo = i.saturating_sub(ctx);
            let hi = i.saturating_add(ctx).min(n - 1);
            keep[lo..=hi].fill(true);
        }

        Selection {
            keep,
            head,
            tail,
            hits,
        }
    }
}

struct Selection {
    keep: Vec<bool>,
    head: usize,
    tail: usize,
    hits: Vec<KeywordHit>,
}

/// Join kept lines, replacing each dropped run with an omission marker.
/// Returns the excerpt and the number of dropped lines.
fn stitch(lines: &[&str], keep: &[bool]) -> (String, usize) {
    let mut out: Vec<Cow<'_, str>> = Vec::with_capacity(lines.len());
    let mut omitted = 0;
    let mut gap = 0;

    for (&line, &kept) in lines.iter().zip(keep) {
        if !kept {
            gap += 1;
            continue;
        }
        if gap > 0 {
            out.push(Cow::Owned(omission_marker(gap)));
            omitted += gap;
            gap = 0;
        }
        out.push(Cow::Borrowed(line));
    }
    if gap > 0 {
        out.push(Cow::Owned(omission_marker(gap)));
        omitted += gap;
    }

    (out.join("\n"), omitted)
}

/// Cut `text` to at most `budget` characters. `None` when it already fits.
fn cut_to_budget(text: &str, budget: usize) -> Option<&str> {
    text.char_indices().nth(budget).map(|(idx, _)| &text[..idx])
}
