//! CLI command definitions, routing, and tracing setup.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use seomapper_core::{ProgressReporter, RunReport, UrlOutcome};
use seomapper_export::ExportFormat;
use seomapper_shared::{AppConfig, KeywordList, RunConfig, init_config, load_config, split_list};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SeoMapper: map keywords to pages and draft better titles and descriptions.
#[derive(Parser)]
#[command(
    name = "seomapper",
    version,
    about = "Map keywords to URLs and suggest new SEO titles and descriptions.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Arguments for the default `run` command.
    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Export file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ExportFormat::Csv,
            OutputFormat::Json => ExportFormat::Json,
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Analyze URLs against candidate keywords (the default).
    Run(RunArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct RunArgs {
    /// Comma-separated URLs. Prompted for on stdin when omitted.
    #[arg(long)]
    pub urls: Option<String>,

    /// Comma-separated candidate keywords. Prompted for on stdin when omitted.
    #[arg(long)]
    pub keywords: Option<String>,

    /// Export file path (defaults to `seo_analysis.csv`, or `.json` with `--format json`).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Export format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Language model identifier, overriding the config file.
    #[arg(long)]
    pub model: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "seomapper=info",
        1 => "seomapper=debug",
        _ => "seomapper=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).with_writer(io::stderr).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => cmd_run(cli.run).await,
        Some(Command::Run(args)) => cmd_run(args).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(args: RunArgs) -> Result<()> {
    let config = load_config()?;
    let run_config = resolve_run_config(&config, &args);

    let urls = match args.urls {
        Some(urls) => split_list(&urls),
        None => split_list(&prompt_line("Enter URLs (comma-separated): ")?),
    };
    let keywords = match args.keywords {
        Some(keywords) => KeywordList::from_input(&keywords),
        None => KeywordList::from_input(&prompt_line("Enter keywords (comma-separated): ")?),
    };

    if urls.is_empty() {
        warn!("no URLs given; the export will contain only the header row");
    }

    info!(
        urls = urls.len(),
        keywords = keywords.len(),
        model = %run_config.openai.model,
        out = %run_config.output_file.display(),
        "starting SEO analysis"
    );

    let reporter = CliProgress::new();
    let report = seomapper_core::run(
        &run_config,
        &urls,
        &keywords,
        args.format.into(),
        &reporter,
    )
    .await?;

    print_summary(&report, &run_config);
    Ok(())
}

/// Apply command-line overrides on top of the file config.
fn resolve_run_config(config: &AppConfig, args: &RunArgs) -> RunConfig {
    let mut run_config = RunConfig::from_app_config(config);
    match &args.out {
        Some(out) => run_config.output_file = out.clone(),
        None => {
            let format = ExportFormat::from(args.format);
            run_config.output_file.set_extension(format.extension());
        }
    }
    if let Some(model) = &args.model {
        run_config.openai.model = model.clone();
    }
    run_config
}

/// Print `label` and read one line from stdin.
fn prompt_line(label: &str) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{label}")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn print_summary(report: &RunReport, run_config: &RunConfig) {
    println!();
    println!("  SEO analysis complete!");
    println!("  Rows:    {}", report.records.len());
    println!("  Skipped: {}", report.skipped.len());
    for (url, reason) in &report.skipped {
        println!("    - {url}: {reason}");
    }
    println!("  Output:  {}", run_config.output_file.display());
    println!("  Time:    {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn url_started(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Analyzing [{current}/{total}] {url}"));
    }

    fn url_finished(&self, outcome: &UrlOutcome) {
        if let UrlOutcome::Skipped { url, reason } = outcome {
            self.spinner.println(format!("  skipped {url}: {reason}"));
        }
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}
