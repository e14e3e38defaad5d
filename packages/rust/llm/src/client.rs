//! Chat-completions client for OpenAI-compatible APIs.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use seomapper_shared::{OpenAiSettings, Result, SeoMapperError, snippet};

use crate::prompts::SYSTEM_PROMPT;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// The subset of the completion response we read.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatReplyMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatReplyMessage {
    /// `null` when the model produced no text (e.g. a refusal or tool call).
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, if any.
    pub fn first_text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Sends two-message conversations (fixed SEO persona + user prompt).
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    settings: OpenAiSettings,
}

impl ChatClient {
    /// Wrap a shared HTTP client with the resolved API settings.
    pub fn new(client: Client, settings: OpenAiSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &OpenAiSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }

    /// Build the request body for `prompt` with the given output budget.
    pub fn build_request(&self, prompt: &str, max_tokens: u32) -> ChatRequest {
        ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            max_tokens,
        }
    }

    /// Send `prompt` and return the first choice's message content, untrimmed.
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let url = self.endpoint();
        let request = self.build_request(prompt, max_tokens);

        debug!(%url, model = %request.model, max_tokens, "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SeoMapperError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SeoMapperError::Network(format!("{url}: failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(SeoMapperError::http(&url, status.as_u16(), &body));
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            SeoMapperError::Llm(format!(
                "invalid completion response: {e} (got: {})",
                snippet(&body, 200)
            ))
        })?;

        parsed
            .first_text()
            .ok_or_else(|| SeoMapperError::Llm("completion had no message content".into()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn settings_for(base_url: &str) -> OpenAiSettings {
        OpenAiSettings {
            api_key: "test-key".into(),
            base_url: base_url.into(),
            model: "gpt-4".into(),
            mapping_max_tokens: 100,
            content_max_tokens: 500,
        }
    }

    pub(crate) fn completion_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}
            ]
        })
    }

    #[test]
    fn request_serializes_two_messages() {
        let client = ChatClient::new(Client::new(), settings_for("https://api.test/v1"));
        let request = client.build_request("pick a keyword", 100);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["max_tokens"], 100);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "pick a keyword");
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let client = ChatClient::new(Client::new(), settings_for("https://api.test/v1/"));
        assert_eq!(client.endpoint(), "https://api.test/v1/chat/completions");
    }

    #[test]
    fn response_with_null_content_has_no_text() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.first_text().is_none());
    }

    #[tokio::test]
    async fn complete_with_mock_server() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/chat/completions"))
            .and(wiremock::matchers::header("authorization", "Bearer test-key"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_json(completion_body("  shoes \n")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatClient::new(Client::new(), settings_for(&server.uri()));
        let text = client.complete("prompt", 100).await.unwrap();
        assert_eq!(text, "  shoes \n");
    }

    #[tokio::test]
    async fn complete_surfaces_http_errors() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(401)
                    .set_body_string(r#"{"error":{"message":"Incorrect API key provided"}}"#),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new(Client::new(), settings_for(&server.uri()));
        let err = client.complete("prompt", 100).await.unwrap_err();
        match err {
            SeoMapperError::Http { status, body, .. } => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("expected Http, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn complete_rejects_empty_choices() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new(Client::new(), settings_for(&server.uri()));
        let err = client.complete("prompt", 100).await.unwrap_err();
        assert!(matches!(err, SeoMapperError::Llm(_)));
    }
}
