//! Lag Tracker CLI
//!
//! Lag window reports from Grafana exports, and article column comparison.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lag_tracker::{
    articles::{
        compare_workbook, render_comparison_csv, render_comparison_xlsx, write_output, Sheet,
    },
    config::Config,
    core::{extract_lag_windows, DaySummary},
    report::{write_report, ReportFormat},
    source::read_source,
    stats::RunStats,
    VERSION,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lag-tracker")]
#[command(version = VERSION)]
#[command(about = "Lag window reports from Grafana CSV exports", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract per-day lag windows from Grafana CSV exports
    Lag {
        /// CSV files exported from Grafana
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file (defaults to lag_tracker.<format> in the export directory)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format (xlsx, csv, json or jsonl)
        #[arg(long)]
        format: Option<String>,
    },

    /// List articles present in the SAP column but missing from the GK column
    Articles {
        /// Workbooks (xlsx, xls, ods) or CSV exports containing both article columns
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory (defaults to the export directory)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format (xlsx or csv)
        #[arg(long, default_value = "xlsx")]
        format: String,
    },

    /// Show statistics of the last run
    Status,

    /// Show configuration
    Config {
        /// Write a default config file (and create the data directories) if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(Config::config_path);
    let config = Config::load_from(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    match cli.command {
        Commands::Lag {
            files,
            output,
            format,
        } => cmd_lag(&config, &files, output, format.as_deref()),
        Commands::Articles {
            files,
            output,
            format,
        } => cmd_articles(&config, &files, output, &format),
        Commands::Status => {
            cmd_status(&config);
            Ok(())
        }
        Commands::Config { init } => cmd_config(&config, &config_path, init),
    }
}

fn cmd_lag(
    config: &Config,
    files: &[PathBuf],
    output: Option<PathBuf>,
    format: Option<&str>,
) -> Result<()> {
    let options = config.source_options()?;

    // Explicit flag, then output extension, then config.
    let format = match format {
        Some(f) => f.parse::<ReportFormat>()?,
        None => output
            .as_deref()
            .and_then(ReportFormat::from_path)
            .unwrap_or(config.report.default_format),
    };
    let output = output.unwrap_or_else(|| {
        config
            .export_path
            .join(format!("lag_tracker.{}", format.extension()))
    });

    let mut stats = RunStats::new("lag");
    let mut all_summaries: Vec<DaySummary> = Vec::new();

    for path in files {
        let source = match read_source(path, &options) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping file");
                eprintln!("Warning: skipping {}: {e}", path.display());
                stats.record_failure();
                continue;
            }
        };

        let days = source.day_count();
        let rows = source.rows_read;
        let coerced = source.coerced_lag_values;
        let summaries = extract_lag_windows(&source.label, source.samples);

        println!(
            "{} [{}]: {} of {} day(s) with lag",
            path.display(),
            source.label,
            summaries.len(),
            days
        );
        stats.record_lag_file(rows, coerced, days, summaries.len());
        all_summaries.extend(summaries);
    }

    let files_processed = stats.files_processed;
    if files_processed == 0 {
        println!("No input file could be read; no report written.");
    } else if all_summaries.is_empty() {
        println!("No lag data found with non-zero values.");
    } else {
        print_summaries(&all_summaries);
        let written = write_report(&output, &all_summaries, format, &config.report.sheet_name)
            .with_context(|| format!("writing report to {}", output.display()))?;
        println!();
        println!("Processed successfully. Wrote {written} row(s) to {output:?}");
    }

    finish_run(config, stats);
    if files_processed == 0 {
        bail!("all {} input file(s) failed", files.len());
    }
    Ok(())
}

fn print_summaries(summaries: &[DaySummary]) {
    println!();
    println!(
        "{:<10}  {:<20}  {:>8}  {:>8}  {:>9}  {:>10}  {:>8}",
        "Day", "Franchise", "Start", "End", "Minutes", "Max Lag", "Peak At"
    );
    for s in summaries {
        println!(
            "{:<10}  {:<20}  {:>8}  {:>8}  {:>9.2}  {:>10}  {:>8}",
            s.day.format("%Y-%m-%d"),
            s.source_label,
            s.window_start.format("%H:%M:%S"),
            s.window_end.format("%H:%M:%S"),
            s.duration_minutes(),
            s.peak_lag,
            s.peak_timestamp.format("%H:%M:%S")
        );
    }
}

fn cmd_articles(
    config: &Config,
    files: &[PathBuf],
    output: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    let format = format.trim().to_lowercase();
    if format != "xlsx" && format != "csv" {
        bail!("unsupported articles format {format:?} (expected xlsx or csv)");
    }
    let output_dir = output.unwrap_or_else(|| config.export_path.clone());

    let mut stats = RunStats::new("articles");

    for path in files {
        println!("Processing: {}", path.display());
        match compare_file(config, path, &output_dir, &format) {
            Ok((missing, written)) => {
                println!("  {missing} article(s) not in reference column, wrote {written:?}");
                stats.record_article_file(missing);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "article comparison failed");
                eprintln!("  Error: {e:#}");
                stats.record_failure();
            }
        }
    }

    finish_run(config, stats);
    Ok(())
}

/// Compare one file and write its result; returns the missing count and output path.
fn compare_file(
    config: &Config,
    path: &Path,
    output_dir: &Path,
    format: &str,
) -> Result<(usize, PathBuf)> {
    let sheets = Sheet::load_workbook(path)?;
    let comparison = compare_workbook(&sheets, &config.articles)?;

    println!(
        "  Found '{}' and '{}' in '{}'",
        comparison.left_column, comparison.right_column, comparison.sheet_name
    );

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "articles".to_string());

    let (bytes, output) = if format == "csv" {
        (
            render_comparison_csv(&comparison)?,
            output_dir.join(format!("not_in_reference_{stem}.csv")),
        )
    } else {
        (
            render_comparison_xlsx(&comparison, &sheets, &config.articles.result_sheet)?,
            output_dir.join(format!("updated_{stem}.xlsx")),
        )
    };
    write_output(&output, &bytes)?;

    Ok((comparison.missing.len(), output))
}

fn finish_run(config: &Config, mut stats: RunStats) {
    stats.finish();
    if let Err(e) = stats.save(&config.stats_path()) {
        tracing::warn!(error = %e, "could not save run statistics");
    }
    println!();
    println!("{}", stats.summary());
}

fn cmd_status(config: &Config) {
    println!("Lag Tracker Status");
    println!("==================");
    println!();
    println!("Export directory: {:?}", config.export_path);
    println!("Data directory: {:?}", config.data_path);
    println!();

    match RunStats::load(&config.stats_path()) {
        Ok(Some(stats)) => {
            println!("Last run started {}", stats.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("{}", stats.summary());
        }
        Ok(None) => println!("No previous run found."),
        Err(e) => eprintln!("Warning: could not read run statistics: {e}"),
    }
}

fn cmd_config(config: &Config, path: &Path, init: bool) -> Result<()> {
    if init {
        if config.init_at(path)? {
            println!("Wrote default configuration to {path:?}");
        } else {
            println!("Configuration already exists at {path:?}");
        }
        println!();
    }

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {path:?}");
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(config).unwrap_or_else(|_| "Error".to_string())
    );
    Ok(())
}
