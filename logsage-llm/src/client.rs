//! Completion client: one interface, interchangeable backends.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use logsage_core::config::{LlmConfig, ProviderKind};
use logsage_core::error::ConfigError;
use reqwest::{Client, Response};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::LlmError;
use crate::mock::MockClient;
use crate::types::{AiResponse, PromptRequest};

/// Longest slice of an error body carried into a cause string.
const ERROR_DETAIL_CHARS: usize = 200;

/// Sends a prompt and classifies what came back.
///
/// Implementations never panic and never return an error: every failure is
/// folded into an [`AiResponse`] outcome.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one completion.
    async fn complete(&self, request: &PromptRequest) -> AiResponse;

    /// Short backend name for diagnostics.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: CompletionClient + ?Sized> CompletionClient for Arc<T> {
    async fn complete(&self, request: &PromptRequest) -> AiResponse {
        (**self).complete(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Where an [`HttpClient`] sends its requests.
#[derive(Debug, Clone)]
pub enum Endpoint {
    /// OpenAI-compatible API (also works with Azure proxies, Together, etc.).
    OpenAiCompatible {
        /// Base URL without the `/v1/...` path.
        base_url: String,
        /// Bearer key. `None` yields an `api_error` without a network call.
        api_key: Option<String>,
    },
    /// Ollama running locally or on the runner network.
    Ollama {
        /// Base URL without the `/api/...` path.
        base_url: String,
    },
}

/// Network-backed client.
///
/// Owns its own `reqwest::Client`; nothing is shared between instances.
pub struct HttpClient {
    endpoint: Endpoint,
    http: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client for an endpoint with a hard per-call timeout.
    #[must_use]
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Self {
        Self {
            endpoint,
            http: Client::new(),
            timeout,
        }
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    async fn try_complete(&self, request: &PromptRequest) -> Result<AiResponse, LlmError> {
        match &self.endpoint {
            Endpoint::OpenAiCompatible { base_url, api_key } => {
                self.complete_openai(base_url, api_key.as_deref(), request).await
            }
            Endpoint::Ollama { base_url } => self.complete_ollama(base_url, request).await,
        }
    }

    /// Complete using an OpenAI-compatible API.
    async fn complete_openai(
        &self,
        base_url: &str,
        api_key: Option<&str>,
        request: &PromptRequest,
    ) -> Result<AiResponse, LlmError> {
        let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) else {
            return Err(LlmError::MissingCredential(
                "no API key configured for the OpenAI-compatible provider".into(),
            ));
        };

        let url = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));
        let body = json!({
            "model": request.model,
            "messages": request.messages,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });
        debug!(%url, model = %request.model, "sending chat completion");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(e, self.timeout_ms()))?;

        let json = self.read_json(resp).await?;
        Ok(AiResponse::from_completion(
            json["choices"][0]["message"]["content"].as_str(),
        ))
    }

    /// Complete using Ollama's chat API.
    async fn complete_ollama(
        &self,
        base_url: &str,
        request: &PromptRequest,
    ) -> Result<AiResponse, LlmError> {
        let url = format!("{}/api/chat", base_url.trim_end_matches('/'));
        let body = json!({
            "model": request.model,
            "messages": request.messages,
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens,
            }
        });
        debug!(%url, model = %request.model, "sending ollama chat");

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(e, self.timeout_ms()))?;

        let json = self.read_json(resp).await?;
        Ok(AiResponse::from_completion(json["message"]["content"].as_str()))
    }

    /// Check the status and decode the body, surfacing in-band error objects.
    async fn read_json(&self, resp: Response) -> Result<Value, LlmError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Http {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| LlmError::from_transport(e, self.timeout_ms()))?;

        if let Some(error) = json.get("error").filter(|e| !e.is_null()) {
            let message = error["message"]
                .as_str()
                .or_else(|| error.as_str())
                .unwrap_or("unspecified error");
            return Err(LlmError::RequestFailed(message.to_string()));
        }
        Ok(json)
    }
}

/// Pull a readable message out of an error body.
fn error_detail(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v["error"]["message"]
                .as_str()
                .or_else(|| v["error"].as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_owned());
    message.chars().take(ERROR_DETAIL_CHARS).collect()
}

#[async_trait]
impl CompletionClient for HttpClient {
    async fn complete(&self, request: &PromptRequest) -> AiResponse {
        let start = Instant::now();
        // The per-request timeout covers the send; this one also bounds the
        // body read.
        let response = match tokio::time::timeout(self.timeout, self.try_complete(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(error = %e, "completion request failed");
                e.into()
            }
            Err(_) => {
                warn!(timeout_ms = self.timeout_ms(), "completion request timed out");
                AiResponse::Timeout {
                    after_ms: self.timeout_ms(),
                }
            }
        };

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            backend = self.name(),
            model = %request.model,
            outcome = %response.outcome(),
            latency_ms,
            "completion finished"
        );
        response
    }

    fn name(&self) -> &str {
        match self.endpoint {
            Endpoint::OpenAiCompatible { .. } => "openai",
            Endpoint::Ollama { .. } => "ollama",
        }
    }
}

/// Build the client selected by configuration.
///
/// The API key is passed in rather than read here, so callers decide where
/// credentials come from.
///
/// # Errors
///
/// Returns [`ConfigError::MissingCredential`] when the provider needs a key,
/// none was supplied, and `require_credentials` is set. Otherwise a missing
/// key surfaces later as an `api_error` outcome.
pub fn build_client(
    config: &LlmConfig,
    api_key: Option<String>,
) -> Result<Box<dyn CompletionClient>, ConfigError> {
    let api_key = api_key.filter(|k| !k.trim().is_empty());
    let timeout = Duration::from_millis(config.request_timeout_ms);
    let base_url = config.effective_base_url().to_string();

    if config.provider.needs_credential() && api_key.is_none() {
        if config.require_credentials {
            return Err(ConfigError::MissingCredential {
                env_var: config.api_key_env.clone(),
            });
        }
        warn!(
            env_var = %config.api_key_env,
            "no API key available; the completion call will report an api_error"
        );
    }

    let client: Box<dyn CompletionClient> = match config.provider {
        ProviderKind::OpenAi => Box::new(HttpClient::new(
            Endpoint::OpenAiCompatible { base_url, api_key },
            timeout,
        )),
        ProviderKind::Ollama => Box::new(HttpClient::new(Endpoint::Ollama { base_url }, timeout)),
        ProviderKind::Mock => Box::new(MockClient::new()),
    };
    Ok(client)
}
