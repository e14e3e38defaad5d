//! Pipeline orchestration for SeoMapper.
//!
//! Ties metadata fetching, keyword mapping, autocomplete lookup, copy
//! generation and export into one sequential run.

pub mod pipeline;

pub use pipeline::{
    ProgressReporter, RunReport, SeoPipeline, SilentProgress, SkipReason, UrlOutcome,
    build_client, run,
};
