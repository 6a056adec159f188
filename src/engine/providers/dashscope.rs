// dashchat Engine: DashScope provider
// One non-streaming POST per user message to the DashScope native
// text-generation endpoint. Implements ChatProvider.

use crate::atoms::error::EngineResult;
use crate::atoms::traits::{ChatProvider, ProviderError};
use crate::engine::config::ProviderConfig;
use crate::engine::http::{parse_retry_after, CircuitBreaker, RetryPolicy};
use crate::engine::truncate_utf8;
use async_trait::async_trait;
use dashchat_core::dashscope::{GenerationRequest, GenerationResponse, ReplyOutcome};
use log::{debug, error, info, warn};
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::Client;
use std::time::Duration;

pub struct DashScopeProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    system_prompt: String,
    retry: RetryPolicy,
    circuit: CircuitBreaker,
}

impl DashScopeProvider {
    pub fn new(config: &ProviderConfig) -> EngineResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(DashScopeProvider {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            retry: RetryPolicy::with_max_retries(config.max_retries),
            circuit: CircuitBreaker::default(),
        })
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_circuit_breaker(mut self, circuit: CircuitBreaker) -> Self {
        self.circuit = circuit;
        self
    }

    /// One HTTP round trip, no retries.
    async fn send_once(&self, body: &GenerationRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let text = response.text().await.unwrap_or_default();
            error!("[dashscope] HTTP {}: {}", status.as_u16(), truncate_utf8(&text, 500));
            // Error bodies are usually {code, message, request_id}; anything else
            // just leaves the detail out.
            let detail: GenerationResponse = serde_json::from_str(&text).unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
                code: detail.code.filter(|c| !c.is_empty()),
                message: detail.message.filter(|m| !m.is_empty()),
                retry_after_secs,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("read body: {}", e)))?;
        let decoded: GenerationResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))?;

        if let (Some(usage), Some(id)) = (decoded.usage, decoded.request_id.as_deref()) {
            debug!(
                "[dashscope] request_id={} tokens in={} out={}",
                id, usage.input_tokens, usage.output_tokens
            );
        }

        match decoded.into_outcome() {
            ReplyOutcome::Reply(text) => Ok(text),
            ReplyOutcome::Malformed => Err(ProviderError::Malformed),
            ReplyOutcome::ApiError { code, message } => Err(ProviderError::Api { code, message }),
            ReplyOutcome::Unknown => Err(ProviderError::UnknownFormat),
        }
    }
}

/// Whether another attempt could help, plus any server-requested wait.
fn retry_hint(error: &ProviderError) -> (bool, Option<u64>) {
    let retry_after = match error {
        ProviderError::Http { retry_after_secs, .. } => *retry_after_secs,
        _ => None,
    };
    (error.is_retryable(), retry_after)
}

#[async_trait]
impl ChatProvider for DashScopeProvider {
    fn name(&self) -> &str {
        "dashscope"
    }

    async fn generate(&self, user_text: &str) -> Result<String, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::Auth(
                "no API key configured (set DASHSCOPE_API_KEY)".into(),
            ));
        }
        self.circuit.check()?;

        let body = GenerationRequest::single_turn(&self.model, &self.system_prompt, user_text);
        info!("[dashscope] Request to {} model={}", self.endpoint, self.model);

        let mut attempt: u32 = 0;
        loop {
            let error = match self.send_once(&body).await {
                Ok(reply) => {
                    self.circuit.record_success();
                    return Ok(reply);
                }
                Err(e) => e,
            };

            let (retryable, retry_after) = retry_hint(&error);
            if matches!(error, ProviderError::Transport(_) | ProviderError::Http { .. }) {
                self.circuit.record_failure();
            } else {
                // The service answered; only the payload was unusable.
                self.circuit.record_success();
            }

            if !retryable || attempt >= self.retry.max_retries {
                return Err(error);
            }
            let delay = self.retry.wait(attempt, retry_after).await;
            attempt += 1;
            warn!(
                "[dashscope] Retry {}/{} after {}ms ({})",
                attempt,
                self.retry.max_retries,
                delay.as_millis(),
                error
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, retry_after_secs: Option<u64>) -> ProviderError {
        ProviderError::Http {
            status,
            reason: String::new(),
            code: None,
            message: None,
            retry_after_secs,
        }
    }

    #[test]
    fn retry_hint_follows_status() {
        assert_eq!(retry_hint(&http(503, Some(2))), (true, Some(2)));
        assert_eq!(retry_hint(&http(429, None)), (true, None));
        assert_eq!(retry_hint(&http(401, None)), (false, None));
        assert_eq!(retry_hint(&ProviderError::Transport("reset".into())), (true, None));
        assert_eq!(retry_hint(&ProviderError::UnknownFormat), (false, None));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let config = ProviderConfig {
            endpoint: "http://127.0.0.1:9/never".into(),
            ..Default::default()
        };
        let provider = DashScopeProvider::new(&config).unwrap();
        let err = provider.generate("hi").await.unwrap_err();
        assert!(matches!(err, ProviderError::Auth(_)));
    }
}
