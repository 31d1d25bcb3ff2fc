//! Offline completion backends.
//!
//! [`MockClient`] gives canned advice from keyword heuristics so the whole
//! pipeline can run in a workflow without a key. [`StaticClient`] returns a
//! preset outcome and records what it was asked; tests use it to drive every
//! formatter branch.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::CompletionClient;
use crate::types::{AiResponse, PromptRequest, Role};

/// Advice for a failed `terraform plan`.
pub const TERRAFORM_ADVICE: &str = "Terraform plan failed. Check the configuration for syntax errors and \
unsupported arguments, make sure every required variable is set for this workspace, and confirm the \
provider version constraints match the lock file.";

/// Advice for an HTTP 500 from an application under test.
pub const SERVER_ERROR_ADVICE: &str = "A service returned 500 Internal Server Error. Review the application \
logs on the affected host around the failure time and look for the first stack trace or unhandled exception.";

/// Advice for a timeout.
pub const TIMEOUT_ADVICE: &str = "The job hit a timeout. Check network connectivity between the runner and \
the services it calls, and look for CPU, memory or bandwidth exhaustion on the systems involved.";

/// Advice when nothing specific matched.
pub const GENERIC_ADVICE: &str = "No specific failure pattern was recognised. Review the log for the first \
error or warning before the step exited and re-run the failing step locally with verbose output.";

/// Deterministic keyword-driven backend. Never touches the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockClient;

impl MockClient {
    /// Create the mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Pick canned advice for a log excerpt.
    #[must_use]
    pub fn advise(log: &str) -> &'static str {
        let lower = log.to_lowercase();
        if lower.contains("terraform plan") && lower.contains("error") {
            TERRAFORM_ADVICE
        } else if log.contains("500 Internal Server Error") {
            SERVER_ERROR_ADVICE
        } else if lower.contains("timeout") || lower.contains("timed out") {
            TIMEOUT_ADVICE
        } else {
            GENERIC_ADVICE
        }
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    async fn complete(&self, request: &PromptRequest) -> AiResponse {
        let log: String = request
            .messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .collect();
        AiResponse::Success {
            text: Self::advise(&log).to_string(),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Returns the same preset response to every call and records the requests.
#[derive(Debug)]
pub struct StaticClient {
    response: AiResponse,
    requests: Mutex<Vec<PromptRequest>>,
}

impl StaticClient {
    /// Answer every call with `response`.
    #[must_use]
    pub fn new(response: AiResponse) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer with a successful completion.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(AiResponse::Success { text: text.into() })
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CompletionClient for StaticClient {
    async fn complete(&self, request: &PromptRequest) -> AiResponse {
        self.requests.lock().push(request.clone());
        self.response.clone()
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PromptMessage;

    fn request(user: &str) -> PromptRequest {
        PromptRequest {
            model: "mock".into(),
            messages: vec![PromptMessage::system("triage"), PromptMessage::user(user)],
            temperature: 0.0,
            max_tokens: 16,
        }
    }

    #[test]
    fn advice_follows_keywords() {
        assert_eq!(
            MockClient::advise("Run terraform plan\nError: Unsupported argument"),
            TERRAFORM_ADVICE
        );
        assert_eq!(
            MockClient::advise("GET /health -> 500 Internal Server Error"),
            SERVER_ERROR_ADVICE
        );
        assert_eq!(MockClient::advise("context deadline exceeded: Timeout"), TIMEOUT_ADVICE);
        assert_eq!(MockClient::advise("all green"), GENERIC_ADVICE);
    }

    #[test]
    fn terraform_needs_an_error_too() {
        assert_eq!(MockClient::advise("terraform plan: no changes"), GENERIC_ADVICE);
    }

    #[tokio::test]
    async fn mock_reads_only_user_segments() {
        let mut req = request("all green");
        req.messages[0].content = "timeout".into();
        let response = MockClient::new().complete(&req).await;
        assert_eq!(
            response,
            AiResponse::Success {
                text: GENERIC_ADVICE.into()
            }
        );
    }

    #[tokio::test]
    async fn static_client_records_each_call() {
        let client = StaticClient::new(AiResponse::Timeout { after_ms: 10 });
        let response = client.complete(&request("log")).await;
        assert_eq!(response, AiResponse::Timeout { after_ms: 10 });
        assert_eq!(client.requests().len(), 1);
        assert_eq!(client.requests()[0].segment(Role::User), Some("log"));
    }
}
