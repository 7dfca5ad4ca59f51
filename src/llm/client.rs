use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::LlmConfig;
use crate::llm::CompletionError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

/// Thin client for an OpenAI-compatible chat-completions endpoint.
///
/// One POST per call: no retry, no backoff, no queueing. Transport timeouts
/// come from the caller via [`with_llm_config`](Self::with_llm_config);
/// the client itself imposes none.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    pub base_url: String,
    api_key: String,
    inner: reqwest::Client,
}

impl CompletionClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, CompletionError> {
        let inner = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            inner,
        })
    }

    /// Rebuild the transport with the configured timeouts. Falls back to the
    /// existing client if the builder fails.
    pub fn with_llm_config(mut self, cfg: &LlmConfig) -> Self {
        let builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
            .timeout(Duration::from_millis(cfg.request_timeout_ms));
        if let Ok(c) = builder.build() {
            self.inner = c;
        }
        self
    }

    fn endpoint(&self) -> String {
        let mut base = self.base_url.trim_end_matches('/').to_string();
        if let Some(pos) = base.rfind("/v1") {
            base.truncate(pos);
            base = base.trim_end_matches('/').to_string();
        }
        format!("{base}/v1/chat/completions")
    }

    /// Send one chat request and return the first choice's content string.
    pub async fn complete(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, CompletionError> {
        let url = self.endpoint();
        let req = ChatRequest {
            model: model.to_string(),
            messages,
            temperature,
            max_tokens,
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "application/json".parse().unwrap());
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", self.api_key).parse().unwrap(),
        );

        if let Ok(payload) = serde_json::to_string(&req) {
            debug!(target: "llm", payload=%payload, endpoint=%url, "sending chat.completions payload");
        }

        let resp = self.inner.post(url).headers(headers).json(&req).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let body: ChatResponse = resp.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(CompletionError::NoContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httptest::{Expectation, Server, matchers::*, responders::*};

    fn hello_messages() -> Vec<ChatMessage> {
        vec![ChatMessage::user("hi")]
    }

    #[tokio::test]
    async fn complete_happy_path() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/v1/chat/completions"),
                request::headers(contains(key("authorization"))),
            ])
            .respond_with(json_encoded(serde_json::json!({
                "id": "test",
                "choices": [
                    {"index":0, "message": {"role":"assistant","content":"hello"}}
                ]
            }))),
        );

        // Provide base with a trailing slash to verify normalization
        let client =
            CompletionClient::new(format!("{}/", server.url_str("")), "test-key").unwrap();
        let content = client
            .complete("gpt-test", hello_messages(), 0.0, 400)
            .await
            .unwrap();
        assert_eq!(content, "hello");
    }

    #[tokio::test]
    async fn complete_non_2xx_carries_status_and_body() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/v1/chat/completions"))
                .respond_with(status_code(429).body("rate limited")),
        );
        let client = CompletionClient::new(server.url_str(""), "test-key").unwrap();
        let err = client
            .complete("gpt-test", hello_messages(), 0.0, 400)
            .await
            .unwrap_err();
        match err {
            CompletionError::Status { status, body } => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn complete_empty_choices_is_no_content() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/v1/chat/completions"))
                .respond_with(json_encoded(serde_json::json!({"choices": []}))),
        );
        let client = CompletionClient::new(server.url_str(""), "test-key").unwrap();
        let err = client
            .complete("gpt-test", hello_messages(), 0.0, 400)
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::NoContent));
    }

    #[tokio::test]
    async fn complete_sends_temperature_and_token_budget() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/v1/chat/completions"),
                request::body(json_decoded(eq(serde_json::json!({
                    "model": "gpt-test",
                    "messages": [{"role": "user", "content": "hi"}],
                    "temperature": 0.0,
                    "max_tokens": 400
                })))),
            ])
            .respond_with(json_encoded(serde_json::json!({
                "choices": [{"message": {"content": "ok"}}]
            }))),
        );
        let client = CompletionClient::new(server.url_str(""), "test-key").unwrap();
        let content = client
            .complete("gpt-test", hello_messages(), 0.0, 400)
            .await
            .unwrap();
        assert_eq!(content, "ok");
    }

    #[test]
    fn endpoint_normalization() {
        let c = CompletionClient::new("https://api.example.com/v1/", "x").unwrap();
        assert_eq!(c.endpoint(), "https://api.example.com/v1/chat/completions");
        let c2 = CompletionClient::new("https://api.example.com/", "x").unwrap();
        assert_eq!(c2.endpoint(), "https://api.example.com/v1/chat/completions");
    }
}
