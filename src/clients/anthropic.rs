use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::Generator;
use crate::config::CoachConfig;
use crate::models::outcome::extract_text;
use crate::models::{RenderedPrompt, UpstreamOutcome};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const MAX_ERROR_EXCERPT_CHARS: usize = 1000;

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Claude Messages API client. One instance is shared by all requests.
pub struct AnthropicClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl AnthropicClient {
    pub fn new(config: &CoachConfig, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: config.timeout,
        }
    }

    /// Builds a client when the config carries a credential.
    pub fn from_config(config: &CoachConfig) -> Option<Self> {
        config.api_key.as_deref().map(|key| Self::new(config, key))
    }

    async fn call(&self, prompt: &RenderedPrompt) -> Result<UpstreamOutcome, reqwest::Error> {
        let payload = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message { role: "user", content: prompt.as_str() }],
        };
        let res = self
            .http
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Claude API returned an error status");
            return Ok(UpstreamOutcome::UpstreamError {
                status: status.as_u16(),
                excerpt: excerpt(&body),
            });
        }

        let body = res.text().await?;
        let reply: Value = serde_json::from_str(&body).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Claude API success body is not JSON");
            Value::Null
        });
        Ok(UpstreamOutcome::Success(extract_text(&reply)))
    }
}

#[async_trait]
impl Generator for AnthropicClient {
    async fn generate(&self, prompt: &RenderedPrompt) -> UpstreamOutcome {
        let started = Instant::now();
        // Dropping the in-flight future on deadline aborts the connection and
        // releases the timer with it.
        let outcome = match tokio::time::timeout(self.timeout, self.call(prompt)).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => UpstreamOutcome::TransportError(format!("Network error: {e}")),
            Err(_) => UpstreamOutcome::Timeout,
        };
        tracing::info!(
            outcome = outcome.kind(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            prompt_len = prompt.as_str().len(),
            "Claude API call settled"
        );
        outcome
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(MAX_ERROR_EXCERPT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MODEL;
    use crate::models::CoachRequest;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: Duration) -> AnthropicClient {
        let config = CoachConfig {
            api_url: format!("{}/v1/messages", server.uri()),
            max_tokens: 123,
            timeout,
            ..CoachConfig::default()
        };
        AnthropicClient::new(&config, "test-key")
    }

    fn prompt() -> RenderedPrompt {
        let req = CoachRequest::from_value(&json!({ "userInput": "I procrastinate" })).unwrap();
        RenderedPrompt::render(&req)
    }

    #[tokio::test]
    async fn sends_messages_request_and_reads_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", ANTHROPIC_VERSION))
            .and(body_partial_json(json!({ "model": DEFAULT_MODEL, "max_tokens": 123 })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "content": [{ "text": "Hello" }] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server, Duration::from_secs(5)).generate(&prompt()).await;
        assert_eq!(outcome, UpstreamOutcome::Success("Hello".into()));
    }

    #[tokio::test]
    async fn error_status_is_classified_with_excerpt() {
        let server = MockServer::start().await;
        let huge = "r".repeat(MAX_ERROR_EXCERPT_CHARS + 500);
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string(huge))
            .expect(1)
            .mount(&server)
            .await;

        match client_for(&server, Duration::from_secs(5)).generate(&prompt()).await {
            UpstreamOutcome::UpstreamError { status, excerpt } => {
                assert_eq!(status, 429);
                assert_eq!(excerpt.chars().count(), MAX_ERROR_EXCERPT_CHARS);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_success_extracts_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let outcome = client_for(&server, Duration::from_secs(5)).generate(&prompt()).await;
        assert_eq!(outcome, UpstreamOutcome::Success(String::new()));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "content": [{ "text": "late" }] }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let started = Instant::now();
        let outcome = client_for(&server, Duration::from_millis(150)).generate(&prompt()).await;
        assert_eq!(outcome, UpstreamOutcome::Timeout);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn deadline_drops_the_connection() {
        use tokio::io::AsyncReadExt;
        use tokio::net::TcpListener;

        // Accepts one connection, never answers, and reports whether the
        // client hung up.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let upstream = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            loop {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => return true,
                    Ok(_) => continue,
                }
            }
        });

        let config = CoachConfig {
            api_url: format!("http://{addr}/v1/messages"),
            timeout: Duration::from_millis(150),
            ..CoachConfig::default()
        };
        let outcome = AnthropicClient::new(&config, "k").generate(&prompt()).await;
        assert_eq!(outcome, UpstreamOutcome::Timeout);

        let closed = tokio::time::timeout(Duration::from_secs(2), upstream)
            .await
            .expect("connection still open after the deadline")
            .unwrap();
        assert!(closed);
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let config = CoachConfig {
            api_url: "http://127.0.0.1:9/v1/messages".into(),
            timeout: Duration::from_secs(5),
            ..CoachConfig::default()
        };
        let outcome = AnthropicClient::new(&config, "k").generate(&prompt()).await;
        assert!(matches!(outcome, UpstreamOutcome::TransportError(_)), "{outcome:?}");
    }

    #[test]
    fn requires_credential() {
        assert!(AnthropicClient::from_config(&CoachConfig::default()).is_none());
        let config = CoachConfig { api_key: Some("k".into()), ..CoachConfig::default() };
        assert!(AnthropicClient::from_config(&config).is_some());
    }
}
