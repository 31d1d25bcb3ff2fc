//! # logsage
//!
//! Reads the log of a failed CI/CD job, asks a language model how to fix
//! it, and prints one suggestion. The suggestion is printed even when the
//! model cannot be reached; only bad input or bad configuration stop a run.
//!
//! ```text
//! Cli ──► LogsageConfig ──► Pipeline::run ──► RunReport
//!                               │                 │
//!            resolve ─ normalize ─ prompt ─ complete
//!                                                 ▼
//!                            stdout (suggestion), stderr (diagnostics),
//!                            $GITHUB_OUTPUT (step output handoff)
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod format;
pub mod handoff;
pub mod logging;
pub mod pipeline;

pub use cli::Cli;
pub use format::Suggestion;
pub use pipeline::{Pipeline, PipelineError, RunReport};
