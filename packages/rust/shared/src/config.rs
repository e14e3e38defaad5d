//! Application configuration for SeoMapper.
//!
//! User config lives at `~/.seomapper/seomapper.toml`.
//! CLI flags override config file values, which override defaults.
//! API keys are never stored in the file; it only names the env vars
//! that hold them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeoMapperError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "seomapper.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".seomapper";

// ---------------------------------------------------------------------------
// Config structs (matching seomapper.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Chat-completions settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Autocomplete search settings.
    #[serde(default)]
    pub serpapi: SerpApiConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Export file written at the end of a run.
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Per-request timeout. Unset means the HTTP client default (none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_file: default_output_file(),
            request_timeout_secs: None,
        }
    }
}

fn default_output_file() -> String {
    "seo_analysis.csv".into()
}

/// `[openai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_openai_key_env")]
    pub api_key_env: String,

    /// Base URL; `/chat/completions` is appended.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Output budget for the keyword-mapping request.
    #[serde(default = "default_mapping_max_tokens")]
    pub mapping_max_tokens: u32,

    /// Output budget for the content-generation request.
    #[serde(default = "default_content_max_tokens")]
    pub content_max_tokens: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openai_key_env(),
            base_url: default_openai_base_url(),
            model: default_model(),
            mapping_max_tokens: default_mapping_max_tokens(),
            content_max_tokens: default_content_max_tokens(),
        }
    }
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4".into()
}
fn default_mapping_max_tokens() -> u32 {
    100
}
fn default_content_max_tokens() -> u32 {
    500
}

/// `[serpapi]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpApiConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_serpapi_key_env")]
    pub api_key_env: String,

    /// Base URL; `/search.json` is appended.
    #[serde(default = "default_serpapi_base_url")]
    pub base_url: String,

    /// Search engine name passed as the `engine` query parameter.
    #[serde(default = "default_engine")]
    pub engine: String,
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_serpapi_key_env(),
            base_url: default_serpapi_base_url(),
            engine: default_engine(),
        }
    }
}

fn default_serpapi_key_env() -> String {
    "SERPAPI_KEY".into()
}
fn default_serpapi_base_url() -> String {
    "https://serpapi.com".into()
}
fn default_engine() -> String {
    "google_autocomplete".into()
}

// ---------------------------------------------------------------------------
// Run config (runtime, merged from config + env + CLI flags)
// ---------------------------------------------------------------------------

/// Resolved chat-completions settings, including the secret.
#[derive(Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub mapping_max_tokens: u32,
    pub content_max_tokens: u32,
}

/// Resolved autocomplete settings, including the secret.
#[derive(Clone)]
pub struct SerpApiSettings {
    pub api_key: String,
    pub base_url: String,
    pub engine: String,
}

// Keys must not end up in log lines.
impl fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("mapping_max_tokens", &self.mapping_max_tokens)
            .field("content_max_tokens", &self.content_max_tokens)
            .finish()
    }
}

impl fmt::Debug for SerpApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerpApiSettings")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("engine", &self.engine)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

/// Everything a run needs, built once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Export destination.
    pub output_file: PathBuf,
    /// Per-request timeout; `None` keeps the client default.
    pub request_timeout: Option<Duration>,
    pub openai: OpenAiSettings,
    pub serpapi: SerpApiSettings,
}

impl RunConfig {
    /// Resolve the file config against the process environment.
    ///
    /// Missing keys are not an error here: they are logged and left empty,
    /// and surface later as authentication failures from the remote APIs.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            output_file: PathBuf::from(&config.defaults.output_file),
            request_timeout: config.defaults.request_timeout_secs.map(Duration::from_secs),
            openai: OpenAiSettings {
                api_key: read_secret(&config.openai.api_key_env),
                base_url: config.openai.base_url.clone(),
                model: config.openai.model.clone(),
                mapping_max_tokens: config.openai.mapping_max_tokens,
                content_max_tokens: config.openai.content_max_tokens,
            },
            serpapi: SerpApiSettings {
                api_key: read_secret(&config.serpapi.api_key_env),
                base_url: config.serpapi.base_url.clone(),
                engine: config.serpapi.engine.clone(),
            },
        }
    }
}

fn read_secret(var_name: &str) -> String {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => val,
        _ => {
            tracing::warn!(var = var_name, "API key env var is not set; remote calls will fail");
            String::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.seomapper/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SeoMapperError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.seomapper/seomapper.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SeoMapperError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        SeoMapperError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SeoMapperError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SeoMapperError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SeoMapperError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
