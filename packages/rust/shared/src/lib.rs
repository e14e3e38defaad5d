//! Shared types, error model, and configuration for SeoMapper.
//!
//! This crate is the foundation depended on by all other SeoMapper crates.
//! It provides:
//! - [`SeoMapperError`]: the unified error type
//! - Domain types ([`SiteRecord`], [`PageMetadata`], [`SeoCopy`], [`KeywordList`])
//! - The fixed sentinel strings the pipeline substitutes for failed steps
//! - Configuration ([`AppConfig`], [`RunConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, OpenAiConfig, OpenAiSettings, RunConfig, SerpApiConfig,
    SerpApiSettings, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, SeoMapperError, snippet};
pub use types::{
    AUTOCOMPLETE_EMPTY, AUTOCOMPLETE_ERROR, GENERATION_ERROR, KeywordList, NOT_AVAILABLE,
    NO_INSIGHTS, PageMetadata, SeoCopy, SiteRecord, split_list,
};
