//! Search-autocomplete suggestions via SerpAPI.
//!
//! The suggestions a search engine offers for a keyword stand in for user
//! search intent when drafting new copy. The result is always non-empty:
//! a genuine empty answer becomes `["No autocomplete data available"]` and a
//! failed request becomes `["Error fetching autocomplete data"]`.

use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use seomapper_shared::{
    AUTOCOMPLETE_EMPTY, AUTOCOMPLETE_ERROR, Result, SeoMapperError, SerpApiSettings, snippet,
};

/// Body of a `search.json` autocomplete response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutocompleteResponse {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    /// SerpAPI reports some failures (bad key, quota) here with a 200 status.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub value: Option<String>,
}

impl AutocompleteResponse {
    /// Suggestion strings in response order; entries without a value give "".
    pub fn values(self) -> Vec<String> {
        self.suggestions
            .into_iter()
            .map(|s| s.value.unwrap_or_default())
            .collect()
    }
}

/// Client for the autocomplete engine.
#[derive(Debug, Clone)]
pub struct AutocompleteClient {
    client: Client,
    settings: SerpApiSettings,
}

impl AutocompleteClient {
    pub fn new(client: Client, settings: SerpApiSettings) -> Self {
        Self { client, settings }
    }

    fn endpoint(&self) -> String {
        format!("{}/search.json", self.settings.base_url.trim_end_matches('/'))
    }

    /// Suggestions for `keyword`, never empty and never an error.
    #[instrument(skip_all, fields(keyword = %keyword.trim()))]
    pub async fn fetch_suggestions(&self, keyword: &str) -> Vec<String> {
        match self.try_fetch_suggestions(keyword).await {
            Ok(suggestions) if suggestions.is_empty() => {
                info!("no autocomplete suggestions");
                vec![AUTOCOMPLETE_EMPTY.to_string()]
            }
            Ok(suggestions) => {
                info!(count = suggestions.len(), ?suggestions, "autocomplete suggestions");
                suggestions
            }
            Err(e) => {
                error!(error = %e, "error fetching autocomplete data");
                vec![AUTOCOMPLETE_ERROR.to_string()]
            }
        }
    }

    /// Fallible core of [`fetch_suggestions`](Self::fetch_suggestions); may
    /// return an empty list.
    pub async fn try_fetch_suggestions(&self, keyword: &str) -> Result<Vec<String>> {
        let url = self.endpoint();
        let query = keyword.trim();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("engine", self.settings.engine.as_str()),
                ("q", query),
                ("api_key", self.settings.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SeoMapperError::Network(format!("{url}: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                SeoMapperError::Network(format!("{url}: failed to read body: {}", e.without_url()))
            })?;

        if !status.is_success() {
            return Err(SeoMapperError::http(&url, status.as_u16(), &body));
        }

        let parsed: AutocompleteResponse = serde_json::from_str(&body).map_err(|e| {
            SeoMapperError::Autocomplete(format!(
                "invalid response: {e} (got: {})",
                snippet(&body, 200)
            ))
        })?;

        if let Some(message) = &parsed.error {
            warn!(error = %message, "autocomplete engine reported an error");
        }

        Ok(parsed.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_for(base_url: &str) -> SerpApiSettings {
        SerpApiSettings {
            api_key: "serp-key".into(),
            base_url: base_url.into(),
            engine: "google_autocomplete".into(),
        }
    }

    #[test]
    fn values_keep_entries_without_value() {
        let json = r#"{"suggestions":[{"value":"shoes for men","relevance":601},{"type":"QUERY"}]}"#;
        let parsed: AutocompleteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.values(), vec!["shoes for men".to_string(), String::new()]);
    }

    #[tokio::test]
    async fn fetch_with_mock_server() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/search.json"))
            .and(wiremock::matchers::query_param("engine", "google_autocomplete"))
            .and(wiremock::matchers::query_param("q", "running shoes"))
            .and(wiremock::matchers::query_param("api_key", "serp-key"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "search_metadata": {"status": "Success"},
                "suggestions": [
                    {"value": "running shoes for women"},
                    {"value": "running shoes near me"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AutocompleteClient::new(Client::new(), settings_for(&server.uri()));
        let suggestions = client.fetch_suggestions("  running shoes \n").await;
        assert_eq!(
            suggestions,
            vec!["running shoes for women".to_string(), "running shoes near me".to_string()]
        );
    }

    #[tokio::test]
    async fn zero_suggestions_gives_single_placeholder() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"suggestions": []})),
            )
            .mount(&server)
            .await;

        let client = AutocompleteClient::new(Client::new(), settings_for(&server.uri()));
        let suggestions = client.fetch_suggestions("zzzz").await;
        assert_eq!(suggestions, vec![AUTOCOMPLETE_EMPTY.to_string()]);
    }

    #[tokio::test]
    async fn engine_error_body_counts_as_empty() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"error": "Google hasn't returned any results for this query."})),
            )
            .mount(&server)
            .await;

        let client = AutocompleteClient::new(Client::new(), settings_for(&server.uri()));
        assert_eq!(
            client.fetch_suggestions("zzzz").await,
            vec![AUTOCOMPLETE_EMPTY.to_string()]
        );
    }

    #[tokio::test]
    async fn http_failure_gives_error_placeholder() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"error": "Invalid API key."})),
            )
            .mount(&server)
            .await;

        let client = AutocompleteClient::new(Client::new(), settings_for(&server.uri()));
        assert_eq!(
            client.fetch_suggestions("shoes").await,
            vec![AUTOCOMPLETE_ERROR.to_string()]
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_gives_error_placeholder() {
        let client = AutocompleteClient::new(Client::new(), settings_for("http://127.0.0.1:59996"));
        assert_eq!(
            client.fetch_suggestions("shoes").await,
            vec![AUTOCOMPLETE_ERROR.to_string()]
        );
    }
}
