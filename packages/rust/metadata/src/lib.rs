//! Page metadata fetcher.
//!
//! Downloads a page and pulls out the two fields the SEO rewrite starts
//! from: the `<title>` text and the `<meta name="description">` content.
//! Fetch failures never propagate out of [`fetch_metadata`]; the caller gets
//! the `("N/A", "N/A")` pair instead.

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{error, info, instrument};

use seomapper_shared::{NOT_AVAILABLE, PageMetadata, Result, SeoMapperError};

/// Fetch title and description for `url`, substituting "N/A" for both on
/// any transport failure or non-success status.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_metadata(client: &Client, url: &str) -> PageMetadata {
    match try_fetch_metadata(client, url).await {
        Ok(metadata) => {
            info!(title = %metadata.title, description = %metadata.description, "fetched page metadata");
            metadata
        }
        Err(e) => {
            error!(error = %e, "error fetching metadata");
            PageMetadata::unavailable()
        }
    }
}

/// Fallible core of [`fetch_metadata`].
pub async fn try_fetch_metadata(client: &Client, url: &str) -> Result<PageMetadata> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SeoMapperError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SeoMapperError::http(url, status.as_u16(), &body));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SeoMapperError::Network(format!("{url}: failed to read body: {e}")))?;

    Ok(extract_metadata(&body))
}

/// Extract the document title and meta description from raw HTML.
///
/// A missing or empty `<title>` gives "N/A"; a missing description tag, or
/// one without a `content` attribute, gives "N/A".
pub fn extract_metadata(html: &str) -> PageMetadata {
    let doc = Html::parse_document(html);

    PageMetadata {
        title: extract_title(&doc).unwrap_or_else(|| NOT_AVAILABLE.into()),
        description: extract_description(&doc).unwrap_or_else(|| NOT_AVAILABLE.into()),
    }
}

fn extract_title(doc: &Html) -> Option<String> {
    let sel = Selector::parse("title").unwrap();
    doc.select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn extract_description(doc: &Html) -> Option<String> {
    let sel = Selector::parse(r#"meta[name="description"]"#).unwrap();
    doc.select(&sel)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(String::from)
}
