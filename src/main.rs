use analytics::{MetricsOptions, MetricsResult, PerformanceAnalytics};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use configuration::{Config, LoggingSettings};
use core_types::{SeriesDocument, TradeCountVariant};
use generator::ListingGenerator;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// The main entry point for the TradeFlow command-line tools.
fn main() -> Result<()> {
    // TRADEFLOW__* overrides may live in a .env file; it is optional.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _guard = init_tracing(&config.logging)?;

    match cli.command {
        Commands::Metrics(args) => handle_metrics(args, &config),
        Commands::Generate(args) => handle_generate(args, &config),
        Commands::Report(args) => handle_report(args, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Performance analytics and demo data for the TradeFlow Expert Advisor marketplace.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of ./config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute metrics for one series given as `{ "data": [...] }` or a bare array.
    Metrics(MetricsArgs),
    /// Generate demo Expert Advisor listings.
    Generate(GenerateArgs),
    /// Print a metrics table for every listing in a listings file.
    Report(ReportArgs),
}

#[derive(Parser)]
struct MetricsArgs {
    /// Input JSON file. Reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// How to count trades. Defaults to the configured variant.
    #[arg(long, value_enum)]
    trade_count: Option<TradeCountVariant>,

    /// Per-period risk-free rate for the Sharpe ratio. Defaults to the configured rate.
    #[arg(long)]
    risk_free_rate: Option<f64>,
}

#[derive(Parser)]
struct GenerateArgs {
    /// JSON file with `names`, `creators` and `descriptions` arrays.
    #[arg(long)]
    dictionaries: PathBuf,

    /// Where to write the generated listings.
    #[arg(long)]
    output: PathBuf,

    /// Number of listings. Defaults to the configured count.
    #[arg(long)]
    count: Option<usize>,

    /// Seed for reproducible output. Defaults to the configured seed, if any.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser)]
struct ReportArgs {
    /// Listings file produced by `generate`.
    #[arg(long)]
    listings: PathBuf,

    /// How to count trades. Defaults to the configured variant.
    #[arg(long, value_enum)]
    trade_count: Option<TradeCountVariant>,
}

// ==============================================================================
// Logging
// ==============================================================================

/// Logs to stderr, and to a daily-rolling file when a directory is configured.
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let filter = || {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&settings.level))
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter().context("Invalid log level")?);

    let (file_layer, guard) = match &settings.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "tradeflow.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter().context("Invalid log level")?);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_metrics(args: MetricsArgs, config: &Config) -> Result<()> {
    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read series from stdin")?;
            buf
        }
    };

    let series = serde_json::from_str::<SeriesDocument>(&raw)
        .context("Input is not a valid performance series")?
        .into_series();

    let options = MetricsOptions {
        trade_count: args.trade_count.unwrap_or(config.analytics.trade_count),
        risk_free_rate: args.risk_free_rate.unwrap_or(config.analytics.risk_free_rate),
    };
    tracing::info!(observations = series.len(), ?options, "Calculating metrics");

    let result = PerformanceAnalytics::new().calculate(&series, &options);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn handle_generate(args: GenerateArgs, config: &Config) -> Result<()> {
    let mut settings = config.generator.clone();
    if let Some(count) = args.count {
        settings.count = count;
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    settings.validate()?;

    let mut dictionaries = generator::load_dictionaries(&args.dictionaries)?;
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let listings = ListingGenerator::new(&settings, rng).generate(&mut dictionaries)?;
    generator::save_listings(&listings, &args.output)?;

    println!(
        "Saved {} Expert Advisors to {}",
        listings.len(),
        args.output.display()
    );
    Ok(())
}

fn handle_report(args: ReportArgs, config: &Config) -> Result<()> {
    let listings = load_listings(&args.listings)?;
    let options = MetricsOptions {
        trade_count: args.trade_count.unwrap_or(config.analytics.trade_count),
        risk_free_rate: config.analytics.risk_free_rate,
    };
    let engine = PerformanceAnalytics::new();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Name", "Risk", "Days", "Gain", "Max DD", "Trades", "Sharpe", "Avg Daily", "Win Rate",
    ]);

    for ea in &listings {
        let metrics = engine.calculate(&ea.performance.data, &options);
        table.add_row(vec![
            Cell::new(&ea.name),
            Cell::new(ea.performance.risk_level.as_str()),
            Cell::new(ea.performance.data.len()),
            Cell::new(MetricsResult::display_percent(metrics.gain_pct)),
            Cell::new(MetricsResult::display_percent(metrics.max_drawdown_pct)),
            Cell::new(metrics.number_of_trades),
            Cell::new(MetricsResult::display(metrics.sharpe_ratio)),
            Cell::new(MetricsResult::display_percent(metrics.average_daily_change_pct)),
            Cell::new(MetricsResult::display_percent(metrics.win_rate_pct)),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn load_listings(path: &Path) -> Result<Vec<generator::ExpertAdvisor>> {
    let listings = generator::load_listings(path)?;
    tracing::info!(count = listings.len(), path = %path.display(), "Loaded listings");
    Ok(listings)
}
