//! # logsage-llm: Prompting and Completion for logsage
//!
//! Turns a [`logsage_core::NormalizedLog`] into a chat-style request and
//! sends it to a language model:
//!   - **OpenAI-compatible API** (`/v1/chat/completions`, bearer key)
//!   - **Ollama** (`/api/chat`, local, no key)
//!   - **Mock** (offline keyword heuristics, for dry runs)
//!
//! Every backend sits behind the [`CompletionClient`] trait and every call
//! ends in an [`AiResponse`]. Transport failures, bad statuses, timeouts and
//! empty completions are outcomes, not errors: the caller always gets
//! something it can turn into a suggestion.
//!
//! Calls are never retried; retry policy belongs to the invoking workflow.

pub mod client;
pub mod error;
pub mod mock;
pub mod prompt;
pub mod types;

pub use client::{CompletionClient, Endpoint, HttpClient, build_client};
pub use error::LlmError;
pub use mock::{MockClient, StaticClient};
pub use prompt::{PromptBuilder, PromptTemplate};
pub use types::{AiResponse, GenerationSettings, Outcome, PromptMessage, PromptRequest, Role};
