//! CLI entry point for the house prices exploratory analysis.

use anyhow::{Result, anyhow};
use clap::Parser;
use housing_eda::{
    AnalysisOutput, Analyzer, EdaConfig, EdaReport, LoadOptions, Relationship, load_table,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory analysis of the house prices training table",
    long_about = "Describes the sale price, relates candidate features to it, computes the \
                  correlation matrix and applies the missing-data rule.\n\n\
                  EXAMPLES:\n  \
                  # Console summary for train.csv in the current directory\n  \
                  housing-eda\n\n  \
                  # Render charts and keep a JSON report\n  \
                  housing-eda -i data/train.csv --plots plots/ -r reports/\n\n  \
                  # Pipe the report to other tools\n  \
                  housing-eda --json | jq .target.skewness"
)]
struct Args {
    /// Path to the training CSV file [default: train.csv]
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Column being explained [default: SalePrice]
    #[arg(short, long)]
    target: Option<String>,

    /// JSON configuration file; flags given here override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render PNG charts into this directory
    #[arg(long, value_name = "DIR")]
    plots: Option<PathBuf>,

    /// Columns missing more than this many values are dropped [default: 1]
    #[arg(long)]
    missing_threshold: Option<usize>,

    /// Number of features ranked against the target and shown in the
    /// zoomed heatmap [default: 10]
    #[arg(long)]
    top: Option<usize>,

    /// Rows of the missing-data table to print [default: 20]
    #[arg(long)]
    missing_rows: Option<usize>,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write the JSON report into this directory as <input_name>_eda_report.json
    #[arg(short = 'r', long, value_name = "DIR")]
    emit_report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the summary)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Layer CLI flags over the configuration file (or the defaults).
fn build_config(args: &Args) -> Result<EdaConfig> {
    let base = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            EdaConfig::from_json_file(path)?
        }
        None => EdaConfig::default(),
    };

    let mut builder = base.to_builder();
    if let Some(ref input) = args.input {
        builder = builder.input(input);
    }
    if let Some(ref target) = args.target {
        builder = builder.target_column(target);
    }
    if let Some(ref dir) = args.plots {
        builder = builder.plot_dir(dir);
    }
    if let Some(threshold) = args.missing_threshold {
        builder = builder.missing_column_threshold(threshold);
    }
    if let Some(top) = args.top {
        builder = builder.top_correlated(top);
    }
    if let Some(rows) = args.missing_rows {
        builder = builder.missing_table_rows(rows);
    }

    Ok(builder.build()?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;

    let data = load_table(&config.input, &LoadOptions::from(&config))?;

    let output = match Analyzer::new(config.clone()).run(data) {
        Ok(output) => output,
        Err(e) => {
            error!("Analysis failed: {}", e);
            return Err(anyhow!("Analysis failed: {}", e));
        }
    };

    let report = EdaReport::build(&config.input, &output);

    if args.json {
        println!("{}", report.to_json_pretty()?);
        return Ok(());
    }

    if let Some(ref dir) = args.emit_report {
        let stem = extract_file_stem(&config.input);
        let report_path = report.write_to_dir(dir, &stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report, &output, &config);

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Print the findings for a person at a terminal.
///
/// Uses `println!` on purpose: this is the primary output, independent of
/// the log level.
fn print_human_readable_summary(report: &EdaReport, output: &AnalysisOutput, config: &EdaConfig) {
    let target = &report.target;

    println!();
    println!("{}", "=".repeat(80));
    println!("EXPLORATORY ANALYSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!();
    println!(
        "Input: {} ({} rows x {} columns)",
        report.input_file, report.original_shape.0, report.original_shape.1
    );
    println!();

    println!("{}", target.column);
    println!("{}", "-".repeat(40));
    for (label, value) in [
        ("count", target.count as f64),
        ("mean", target.mean),
        ("std", target.std),
        ("min", target.min),
        ("25%", target.q25),
        ("50%", target.q50),
        ("75%", target.q75),
        ("max", target.max),
    ] {
        println!("  {:<8} {:>16.6}", label, value);
    }
    match (target.skewness, target.skew_class) {
        (Some(skew), Some(class)) => println!("  Skewness: {:.6} ({})", skew, class),
        _ => println!("  Skewness: n/a"),
    }
    if let Some(kurt) = target.kurtosis {
        println!("  Kurtosis: {:.6}", kurt);
    }
    println!();

    println!("Feature relationships:");
    for relationship in &report.relationships {
        match relationship {
            Relationship::Numeric {
                feature, pearson, ..
            } => match pearson {
                Some(r) => println!("  {:<20} numeric      r = {:.6}", feature, r),
                None => println!("  {:<20} numeric      r = n/a", feature),
            },
            Relationship::Categorical {
                feature, groups, ..
            } => {
                let medians = groups.iter().map(|g| g.stats.median);
                let (low, high) = medians.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), m| {
                    (lo.min(m), hi.max(m))
                });
                if groups.is_empty() {
                    println!("  {:<20} categorical  no groups", feature);
                } else {
                    println!(
                        "  {:<20} categorical  {} groups, medians {:.0} .. {:.0}",
                        feature,
                        groups.len(),
                        low,
                        high
                    );
                }
            }
        }
    }
    println!();

    let correlation = &report.correlation;
    println!(
        "Top correlated with {} ({} numeric columns):",
        target.column, correlation.numeric_columns
    );
    for ranked in &correlation.top_correlated {
        println!("  {:<20} {:>8.4}", ranked.feature, ranked.r);
    }
    if !correlation.collinear_pairs.is_empty() {
        println!(
            "Collinear pairs (|r| >= {}):",
            config.collinearity_threshold
        );
        for pair in &correlation.collinear_pairs {
            println!("  {:<16} ~ {:<16} {:>8.4}", pair.first, pair.second, pair.r);
        }
    }
    println!();

    println!("Missing data:");
    println!("  {:<20} {:>8} {:>10}", "Column", "Total", "Percent");
    println!("  {}", "-".repeat(40));
    for entry in output.missing.head(config.missing_table_rows) {
        println!(
            "  {:<20} {:>8} {:>10.6}",
            entry.column, entry.total, entry.percent
        );
    }
    println!();

    let cleaning = &report.cleaning;
    println!("Cleaning:");
    println!(
        "  Columns: {} -> {} ({} dropped)",
        cleaning.columns_before,
        cleaning.columns_after,
        cleaning.dropped_columns.len()
    );
    println!(
        "  Rows: {} -> {} ({} dropped for {:?})",
        cleaning.rows_before, cleaning.rows_after, cleaning.dropped_rows, cleaning.row_drop_columns
    );
    println!("  Missing values remaining: {}", cleaning.remaining_missing);

    if !report.charts.is_empty() {
        println!();
        println!("Charts:");
        for chart in &report.charts {
            println!("  - {}", chart);
        }
    }

    println!("{}", "=".repeat(80));
}
