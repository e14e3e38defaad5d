//! SeoMapper CLI: keyword mapping and SEO copy suggestions for a list of URLs.
//!
//! Reads page metadata, asks a language model for the best keyword per page,
//! looks up search autocomplete suggestions and drafts a new title and
//! description. Results are exported as a CSV table.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
