//! Keyword mapping: ask the model which candidate keyword fits a page.

use tracing::{error, info, instrument};

use seomapper_shared::{KeywordList, NOT_AVAILABLE, PageMetadata, Result};

use crate::client::ChatClient;
use crate::prompts::keyword_mapping_prompt;

/// Map the most relevant keyword to `url`, returning "N/A" on any failure.
///
/// Callers treat "N/A" as the signal to skip the rest of the pipeline for
/// this URL.
pub async fn map_keyword(
    chat: &ChatClient,
    url: &str,
    keywords: &KeywordList,
    metadata: &PageMetadata,
) -> String {
    match try_map_keyword(chat, url, keywords, metadata).await {
        Ok(keyword) => keyword,
        Err(e) => {
            error!(url, error = %e, "error mapping keyword");
            NOT_AVAILABLE.into()
        }
    }
}

/// Fallible core of [`map_keyword`]; returns the trimmed reply text.
#[instrument(skip_all, fields(url = %url, candidates = keywords.len()))]
pub async fn try_map_keyword(
    chat: &ChatClient,
    url: &str,
    keywords: &KeywordList,
    metadata: &PageMetadata,
) -> Result<String> {
    let prompt = keyword_mapping_prompt(url, keywords, metadata);
    let reply = chat
        .complete(&prompt, chat.settings().mapping_max_tokens)
        .await?;

    let keyword = reply.trim().to_string();
    info!(keyword = %keyword, "mapped keyword");
    Ok(keyword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{completion_body, settings_for};

    fn metadata() -> PageMetadata {
        PageMetadata {
            title: "Running Shoes | Acme".into(),
            description: "Lightweight trainers".into(),
        }
    }

    #[tokio::test]
    async fn maps_trimmed_keyword_with_mapping_budget() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/chat/completions"))
            .and(wiremock::matchers::body_partial_json(
                serde_json::json!({"model": "gpt-4", "max_tokens": 100}),
            ))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_json(completion_body("\n shoes \n")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let chat = ChatClient::new(reqwest::Client::new(), settings_for(&server.uri()));
        let keywords = KeywordList::from_input("shoes, socks");
        let keyword = map_keyword(&chat, "https://a.test", &keywords, &metadata()).await;
        assert_eq!(keyword, "shoes");
    }

    #[tokio::test]
    async fn request_failure_maps_to_not_available() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let chat = ChatClient::new(reqwest::Client::new(), settings_for(&server.uri()));
        let keywords = KeywordList::from_input("shoes, socks");
        let keyword = map_keyword(&chat, "https://a.test", &keywords, &metadata()).await;
        assert_eq!(keyword, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn undecodable_reply_is_an_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let chat = ChatClient::new(reqwest::Client::new(), settings_for(&server.uri()));
        let keywords = KeywordList::from_input("shoes");
        let err = try_map_keyword(&chat, "https://a.test", &keywords, &metadata())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid completion response"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_maps_to_not_available() {
        let chat = ChatClient::new(reqwest::Client::new(), settings_for("http://127.0.0.1:59997"));
        let keywords = KeywordList::from_input("shoes");
        let keyword = map_keyword(&chat, "https://a.test", &keywords, &metadata()).await;
        assert_eq!(keyword, NOT_AVAILABLE);
    }
}
