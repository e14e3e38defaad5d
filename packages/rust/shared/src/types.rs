//! Core domain types for SeoMapper runs.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sentinels
// ---------------------------------------------------------------------------

/// Placeholder for any value a step could not produce.
pub const NOT_AVAILABLE: &str = "N/A";

/// Single suggestion returned when the autocomplete engine found nothing.
pub const AUTOCOMPLETE_EMPTY: &str = "No autocomplete data available";

/// Single suggestion returned when the autocomplete request failed.
pub const AUTOCOMPLETE_ERROR: &str = "Error fetching autocomplete data";

/// Insights value when the reply has no insights section or no bullets in it.
pub const NO_INSIGHTS: &str = "No insights available.";

/// Insights value when content generation or reply parsing failed.
pub const GENERATION_ERROR: &str = "Error parsing GPT-4 response";

// ---------------------------------------------------------------------------
// Input lists
// ---------------------------------------------------------------------------

/// Split a comma-separated input line into trimmed, non-empty entries.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Candidate keywords supplied once per run and shared by every URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordList(Vec<String>);

impl KeywordList {
    /// Parse a comma-separated prompt answer.
    pub fn from_input(input: &str) -> Self {
        Self(split_list(input))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the list the way it is embedded in prompts.
    pub fn to_prompt_text(&self) -> String {
        self.0.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Step outputs
// ---------------------------------------------------------------------------

/// Title and meta description scraped from a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
}

impl PageMetadata {
    /// The `("N/A", "N/A")` pair used when a page could not be fetched.
    pub fn unavailable() -> Self {
        Self {
            title: NOT_AVAILABLE.into(),
            description: NOT_AVAILABLE.into(),
        }
    }
}

/// Rewritten SEO copy drafted by the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoCopy {
    pub title: String,
    pub description: String,
    pub insights: String,
}

impl SeoCopy {
    /// The triple substituted when generation or parsing failed.
    pub fn failed() -> Self {
        Self {
            title: NOT_AVAILABLE.into(),
            description: NOT_AVAILABLE.into(),
            insights: GENERATION_ERROR.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SiteRecord
// ---------------------------------------------------------------------------

/// One finished row of the analysis, one per successfully mapped URL.
///
/// Field order is the export column order; the serde names are the column
/// headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Mapped Keyword")]
    pub mapped_keyword: String,
    #[serde(rename = "Current Title")]
    pub meta_title: String,
    #[serde(rename = "Current Description")]
    pub meta_description: String,
    #[serde(rename = "New SEO Title")]
    pub new_title: String,
    #[serde(rename = "New SEO Description")]
    pub new_description: String,
    #[serde(rename = "Insights")]
    pub insights: String,
}

impl SiteRecord {
    /// Column headers in export order.
    pub const COLUMNS: [&'static str; 7] = [
        "URL",
        "Mapped Keyword",
        "Current Title",
        "Current Description",
        "New SEO Title",
        "New SEO Description",
        "Insights",
    ];

    /// Assemble a record from the outputs of the four pipeline steps.
    pub fn new(url: &str, keyword: &str, metadata: PageMetadata, copy: SeoCopy) -> Self {
        Self {
            url: url.to_string(),
            mapped_keyword: keyword.to_string(),
            meta_title: metadata.title,
            meta_description: metadata.description,
            new_title: copy.title,
            new_description: copy.description,
            insights: copy.insights,
        }
    }
}
