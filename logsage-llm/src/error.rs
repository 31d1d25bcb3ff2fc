//! LLM error types.

use thiserror::Error;

use crate::types::AiResponse;

/// Errors that can occur while talking to a completion endpoint.
///
/// These never leave the client as errors: [`AiResponse::from`] classifies
/// each one into a recoverable outcome.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed before a response arrived.
    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    /// Response body was not the JSON we expected.
    #[error("failed to parse LLM response: {0}")]
    ParseError(String),

    /// Request timed out.
    #[error("LLM request timed out after {0}ms")]
    Timeout(u64),

    /// Endpoint could not be reached.
    #[error("LLM provider unavailable: {0}")]
    Unavailable(String),

    /// Endpoint answered with a non-2xx status.
    #[error("{}", describe_status(*status, detail))]
    Http {
        /// HTTP status code.
        status: u16,
        /// Start of the response body, for context.
        detail: String,
    },

    /// No API key was supplied for a provider that needs one.
    #[error("missing credential: {0}")]
    MissingCredential(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(0)
        } else if err.is_connect() {
            LlmError::Unavailable(err.to_string())
        } else if err.is_decode() {
            LlmError::ParseError(err.to_string())
        } else {
            LlmError::RequestFailed(err.to_string())
        }
    }
}

impl LlmError {
    /// Classify a transport error, filling in the configured timeout.
    #[must_use]
    pub fn from_transport(err: reqwest::Error, timeout_ms: u64) -> Self {
        match Self::from(err) {
            Self::Timeout(_) => Self::Timeout(timeout_ms),
            other => other,
        }
    }
}

fn describe_status(status: u16, detail: &str) -> String {
    let kind = match status {
        401 | 403 => "authentication rejected",
        429 => "rate limited",
        500..=599 => "server error",
        _ => "request rejected",
    };
    if detail.is_empty() {
        format!("{kind} (HTTP {status})")
    } else {
        format!("{kind} (HTTP {status}): {detail}")
    }
}

impl From<LlmError> for AiResponse {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout(after_ms) => AiResponse::Timeout { after_ms },
            other => AiResponse::ApiError {
                cause: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_status_is_described() {
        let err = LlmError::Http {
            status: 401,
            detail: "invalid api key".into(),
        };
        assert_eq!(err.to_string(), "authentication rejected (HTTP 401): invalid api key");
    }

    #[test]
    fn rate_limit_status_is_described() {
        let err = LlmError::Http {
            status: 429,
            detail: String::new(),
        };
        assert_eq!(err.to_string(), "rate limited (HTTP 429)");
    }

    #[test]
    fn timeout_becomes_timeout_outcome() {
        let response: AiResponse = LlmError::Timeout(2500).into();
        assert_eq!(response, AiResponse::Timeout { after_ms: 2500 });
    }

    #[test]
    fn invalid_url_is_request_failed() {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .expect_err("should fail");
        let llm = LlmError::from_transport(err, 1_000);
        assert!(matches!(llm, LlmError::RequestFailed(_)), "{llm:?}");
        let response: AiResponse = llm.into();
        assert_eq!(response.outcome(), crate::types::Outcome::ApiError);
    }

    #[test]
    fn other_errors_become_api_error() {
        let response: AiResponse = LlmError::MissingCredential("OPENAI_API_KEY is not set".into()).into();
        match response {
            AiResponse::ApiError { cause } => assert!(cause.contains("OPENAI_API_KEY")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
