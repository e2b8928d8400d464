//! Log Rollup CLI
//!
//! Counts timestamped log lines per time window.

use anyhow::Context;
use chrono::{Local, TimeZone};
use clap::Parser;
use log_rollup::{
    input, render, Config, RenderOptions, RunStats, TimestampExtractor, WindowAccumulator,
    WindowSpec, VERSION,
};
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rollup")]
#[command(version = VERSION)]
#[command(about = "Roll up event data into counts per time window", long_about = None)]
struct Cli {
    /// Time window size for rollups, e.g. 1m, 2h, 3d, 4w
    #[arg(short, long)]
    window: Option<String>,

    /// IANA time zone used to align windows (defaults to the system zone)
    #[arg(short = 'z', long = "tz")]
    timezone: Option<String>,

    /// Year assumed for timestamps that omit one, such as syslog (defaults to this year)
    #[arg(long)]
    year: Option<i32>,

    /// Order rows by window start instead of first appearance
    #[arg(long)]
    sorted: bool,

    /// Config file (defaults to <config dir>/log-rollup/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print run statistics to stderr after the report
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Input files, read in order; stdin when none are given or for "-"
    files: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Could not load configuration")?;
    let spec = config.resolve_window(cli.window.as_deref())?;
    let options = RenderOptions {
        sorted: cli.sorted || config.sorted,
    };

    match config.resolve_timezone(cli.timezone.as_deref())? {
        Some(tz) => {
            tracing::info!(window = %spec, timezone = %tz.name(), "starting rollup");
            rollup(tz, spec, cli, &options)
        }
        None => {
            tracing::info!(window = %spec, timezone = "local", "starting rollup");
            rollup(Local, spec, cli, &options)
        }
    }
}

fn rollup<Tz>(tz: Tz, spec: WindowSpec, cli: &Cli, options: &RenderOptions) -> anyhow::Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut extractor = TimestampExtractor::new(tz)?;
    if let Some(year) = cli.year {
        extractor = extractor.with_default_year(year);
    }
    let mut windows = WindowAccumulator::new(spec);
    let mut stats = RunStats::new();

    if cli.files.is_empty() {
        read_stdin(&extractor, &mut windows, &mut stats)?;
    }
    for path in &cli.files {
        if path == Path::new("-") {
            read_stdin(&extractor, &mut windows, &mut stats)?;
            continue;
        }

        tracing::debug!(file = %path.display(), "reading");
        let file = File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
        input::ingest(BufReader::new(file), &extractor, &mut windows, &mut stats)
            .with_context(|| format!("Could not read {}", path.display()))?;
    }

    let table = render(windows.windows(), options);
    io::stdout()
        .lock()
        .write_all(table.as_bytes())
        .context("Could not write report")?;

    tracing::info!(
        lines = stats.lines_read,
        counted = stats.timestamps_placed,
        skipped = stats.lines_skipped,
        windows = windows.len(),
        "rollup complete"
    );
    if stats.lines_read > 0 && stats.timestamps_placed == 0 {
        tracing::warn!("no timestamps recognized in {} lines of input", stats.lines_read);
    }

    if cli.stats {
        eprintln!("{}", stats.summary());
    }

    Ok(())
}

fn read_stdin<Tz: TimeZone>(
    extractor: &TimestampExtractor<Tz>,
    windows: &mut WindowAccumulator<Tz>,
    stats: &mut RunStats,
) -> anyhow::Result<()> {
    tracing::debug!("reading stdin");
    input::ingest(io::stdin().lock(), extractor, windows, stats).context("Could not read stdin")
}
