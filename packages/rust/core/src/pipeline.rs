//! End-to-end SEO pipeline: URL → metadata → keyword → autocomplete → copy → export.
//!
//! URLs are processed strictly one at a time. Each step converts its own
//! failures into sentinel values, except keyword mapping: a URL without a
//! keyword is skipped and does not appear in the exported table.

use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{info, instrument, warn};

use seomapper_autocomplete::AutocompleteClient;
use seomapper_export::ExportFormat;
use seomapper_llm::ChatClient;
use seomapper_shared::{KeywordList, NOT_AVAILABLE, Result, RunConfig, SeoMapperError, SiteRecord};

/// User-Agent string for page and API requests.
const USER_AGENT: &str = concat!("SeoMapper/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why a URL produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The keyword request failed or its reply could not be decoded.
    MappingFailed(String),
    /// The model answered "N/A".
    ModelDeclined,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MappingFailed(message) => write!(f, "keyword mapping failed: {message}"),
            Self::ModelDeclined => f.write_str("no keyword selected by the model"),
        }
    }
}

/// Result of running the pipeline for a single URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlOutcome {
    Completed(SiteRecord),
    Skipped { url: String, reason: SkipReason },
}

impl UrlOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Completed(record) => &record.url,
            Self::Skipped { url, .. } => url,
        }
    }
}

/// Everything a run produced, in input order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Completed rows, in input order.
    pub records: Vec<SiteRecord>,
    /// URLs that produced no row, with the reason.
    pub skipped: Vec<(String, SkipReason)>,
    /// Wall time of the run.
    pub elapsed: Duration,
}

impl RunReport {
    fn push(&mut self, outcome: UrlOutcome) {
        match outcome {
            UrlOutcome::Completed(record) => self.records.push(record),
            UrlOutcome::Skipped { url, reason } => self.skipped.push((url, reason)),
        }
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a URL is processed.
    fn url_started(&self, url: &str, current: usize, total: usize);
    /// Called after a URL is completed or skipped.
    fn url_finished(&self, outcome: &UrlOutcome);
    /// Called when the run completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn url_started(&self, _url: &str, _current: usize, _total: usize) {}
    fn url_finished(&self, _outcome: &UrlOutcome) {}
    fn done(&self, _report: &RunReport) {}
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Build the single HTTP client shared by every step of a run.
pub fn build_client(config: &RunConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| SeoMapperError::Network(format!("failed to build HTTP client: {e}")))
}

/// The four pipeline steps wired to one HTTP client.
#[derive(Debug, Clone)]
pub struct SeoPipeline {
    http: Client,
    chat: ChatClient,
    autocomplete: AutocompleteClient,
}

impl SeoPipeline {
    pub fn new(config: &RunConfig) -> Result<Self> {
        let http = build_client(config)?;
        Ok(Self {
            chat: ChatClient::new(http.clone(), config.openai.clone()),
            autocomplete: AutocompleteClient::new(http.clone(), config.serpapi.clone()),
            http,
        })
    }

    /// Run all four steps for one URL.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn process_url(&self, url: &str, keywords: &KeywordList) -> UrlOutcome {
        let metadata = seomapper_metadata::fetch_metadata(&self.http, url).await;

        let keyword =
            match seomapper_llm::try_map_keyword(&self.chat, url, keywords, &metadata).await {
                Ok(keyword) if keyword == NOT_AVAILABLE => {
                    warn!(reply = %keyword, "model selected no keyword, skipping URL");
                    return UrlOutcome::Skipped {
                        url: url.to_string(),
                        reason: SkipReason::ModelDeclined,
                    };
                }
                Ok(keyword) => keyword,
                Err(e) => {
                    warn!(error = %e, "keyword mapping failed, skipping URL");
                    return UrlOutcome::Skipped {
                        url: url.to_string(),
                        reason: SkipReason::MappingFailed(e.to_string()),
                    };
                }
            };

        let suggestions = self.autocomplete.fetch_suggestions(&keyword).await;

        let copy = seomapper_llm::generate_seo_content(
            &self.chat,
            url,
            &keyword,
            &metadata,
            &suggestions,
        )
        .await;

        UrlOutcome::Completed(SiteRecord::new(url, &keyword, metadata, copy))
    }

    /// Process every URL in order and collect the outcomes.
    #[instrument(skip_all, fields(urls = urls.len(), keywords = keywords.len()))]
    pub async fn compile_results(
        &self,
        urls: &[String],
        keywords: &KeywordList,
        progress: &dyn ProgressReporter,
    ) -> RunReport {
        let start = Instant::now();
        let mut report = RunReport::default();
        let total = urls.len();

        progress.phase("Analyzing URLs");
        for (i, url) in urls.iter().enumerate() {
            progress.url_started(url, i + 1, total);
            let outcome = self.process_url(url, keywords).await;
            progress.url_finished(&outcome);
            report.push(outcome);
        }

        report.elapsed = start.elapsed();
        info!(
            completed = report.records.len(),
            skipped = report.skipped.len(),
            elapsed_ms = report.elapsed.as_millis(),
            "results compiled"
        );

        report
    }
}

/// Run the full pipeline and export the records to `config.output_file`.
pub async fn run(
    config: &RunConfig,
    urls: &[String],
    keywords: &KeywordList,
    format: ExportFormat,
    progress: &dyn ProgressReporter,
) -> Result<RunReport> {
    if keywords.is_empty() {
        warn!("no candidate keywords supplied");
    }

    let pipeline = SeoPipeline::new(config)?;
    let report = pipeline.compile_results(urls, keywords, progress).await;

    progress.phase("Exporting results");
    export(&report, &config.output_file, format)?;

    progress.done(&report);
    Ok(report)
}

fn export(report: &RunReport, path: &Path, format: ExportFormat) -> Result<()> {
    seomapper_export::save_results(&report.records, path, format)?;
    info!(path = %path.display(), rows = report.records.len(), "results saved");
    Ok(())
}
