//! SEO copy generation from page metadata and autocomplete suggestions.

use tracing::{debug, error, instrument};

use seomapper_shared::{PageMetadata, Result, SeoCopy};

use crate::client::ChatClient;
use crate::parser::parse_gpt_reply;
use crate::prompts::content_prompt;

/// Draft a new title, description and insights for `url`.
///
/// Request failures give [`SeoCopy::failed`]; off-format replies are handled
/// by the parser.
pub async fn generate_seo_content(
    chat: &ChatClient,
    url: &str,
    keyword: &str,
    metadata: &PageMetadata,
    suggestions: &[String],
) -> SeoCopy {
    match try_generate_seo_content(chat, url, keyword, metadata, suggestions).await {
        Ok(reply) => parse_gpt_reply(&reply, url),
        Err(e) => {
            error!(url, error = %e, "error generating SEO content");
            SeoCopy::failed()
        }
    }
}

/// Send the content prompt and return the raw reply text.
#[instrument(skip_all, fields(url = %url, keyword = %keyword))]
pub async fn try_generate_seo_content(
    chat: &ChatClient,
    url: &str,
    keyword: &str,
    metadata: &PageMetadata,
    suggestions: &[String],
) -> Result<String> {
    let prompt = content_prompt(url, keyword, metadata, suggestions);
    let reply = chat
        .complete(&prompt, chat.settings().content_max_tokens)
        .await?;

    debug!(reply = %reply, "content reply");
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{completion_body, settings_for};
    use seomapper_shared::GENERATION_ERROR;

    fn metadata() -> PageMetadata {
        PageMetadata {
            title: "Widget Shop".into(),
            description: "N/A".into(),
        }
    }

    #[tokio::test]
    async fn generates_and_parses_copy() {
        let server = wiremock::MockServer::start().await;

        let reply = "1. SEO Title: Best Widgets\n2. SEO Description: Buy widgets now\n3. Insights:\n- Users search at night\n- Users prefer mobile";

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/chat/completions"))
            .and(wiremock::matchers::body_partial_json(
                serde_json::json!({"max_tokens": 500}),
            ))
            .and(wiremock::matchers::body_string_contains("widgets near me"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(completion_body(reply)))
            .expect(1)
            .mount(&server)
            .await;

        let chat = ChatClient::new(reqwest::Client::new(), settings_for(&server.uri()));
        let suggestions = vec!["widgets near me".to_string(), "widgets cheap".to_string()];
        let copy =
            generate_seo_content(&chat, "https://a.test", "widgets", &metadata(), &suggestions)
                .await;

        assert_eq!(copy.title, "Best Widgets");
        assert_eq!(copy.description, "Buy widgets now");
        assert_eq!(copy.insights, "- Users search at night - Users prefer mobile");
    }

    #[tokio::test]
    async fn request_failure_gives_failure_triple() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let chat = ChatClient::new(reqwest::Client::new(), settings_for(&server.uri()));
        let copy = generate_seo_content(&chat, "https://a.test", "widgets", &metadata(), &[]).await;

        assert_eq!(copy.title, "N/A");
        assert_eq!(copy.description, "N/A");
        assert_eq!(copy.insights, GENERATION_ERROR);
    }

    #[tokio::test]
    async fn empty_reply_gives_failure_triple() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(completion_body("")))
            .mount(&server)
            .await;

        let chat = ChatClient::new(reqwest::Client::new(), settings_for(&server.uri()));
        let copy = generate_seo_content(&chat, "https://a.test", "widgets", &metadata(), &[]).await;
        assert_eq!(copy, SeoCopy::failed());
    }
}
