//! # logsage-core
//!
//! Input side of the logsage pipeline: resolving the raw CI/CD log and
//! bounding it to the language model's context budget.
//!
//! ```text
//! --log-file / --log-string
//!          │
//!          ▼
//!   source::resolve ──► LogPayload
//!                           │
//!                           ▼
//!   Normalizer::normalize ──► NormalizedLog  (≤ max_chars, truncated flag)
//! ```
//!
//! Everything here is synchronous and free of process-wide state. The only
//! side effect is the single file read in [`source::resolve`].

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod normalize;
pub mod source;
pub mod types;

pub use config::LogsageConfig;
pub use error::{ConfigError, SourceError};
pub use normalize::Normalizer;
pub use types::*;
