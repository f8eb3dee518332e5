//! Keypoint Motion
//!
//! Derives per-keypoint location series and movement totals from a
//! pose-estimation coordinate table.

mod cli;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::Context;
use cli::{Cli, Commands};
use motion_core::{CoordinateField, FieldKey, Keypoint};
use motion_ingest::{strip_leading_header_row, HeaderLayout};
use motion_metrics::{AnalysisConfig, AnalysisOutcome, LocationMetric, MotionAnalyzer};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::from_env().context("Failed to load config from environment")?,
    };

    match cli.command {
        Commands::Analyze {
            input,
            raw,
            window,
            metric,
            scatter_keypoint,
            report,
        } => {
            let config = apply_overrides(config, raw, window, metric, scatter_keypoint);
            run_analyze(&input, report.as_deref(), config)?;
        }
        Commands::StripHeader { input, output } => {
            run_strip_header(&input, &output)?;
        }
        Commands::Keypoints => {
            run_keypoints();
        }
    }

    Ok(())
}

fn apply_overrides(
    mut config: AnalysisConfig,
    raw: bool,
    window: Option<usize>,
    metric: Option<LocationMetric>,
    scatter_keypoint: Option<Keypoint>,
) -> AnalysisConfig {
    if raw {
        config.header_layout = HeaderLayout::Raw;
    }
    if let Some(window) = window {
        config.analysis_window_frames = window;
    }
    if let Some(metric) = metric {
        config.location_metric = metric;
    }
    if let Some(keypoint) = scatter_keypoint {
        config.scatter_keypoint = keypoint;
    }
    config
}

fn run_analyze(input: &Path, report: Option<&Path>, config: AnalysisConfig) -> anyhow::Result<()> {
    info!(input = %input.display(), "Analyzing coordinate table");

    let analyzer = MotionAnalyzer::new(config).context("Invalid analysis configuration")?;
    let outcome = analyzer
        .analyze_path(input)
        .with_context(|| format!("Analysis of {} failed", input.display()))?;

    print_summary(&outcome);

    if let Some(path) = report {
        outcome
            .report(analyzer.config(), Some(input))
            .write_json(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn print_summary(outcome: &AnalysisOutcome) {
    let counts = outcome.frame_counts();
    println!(
        "Frames: {} ingested, {} analyzed, {} deltas",
        counts.ingested, counts.cleaned, counts.deltas
    );
    println!();
    println!("{:<16} {:>20}", "Body part", "Total movement");
    println!("{}", "-".repeat(37));
    for (keypoint, total) in outcome.movement.iter() {
        println!("{:<16} {:>20.3}", keypoint.display_name(), total);
    }

    if let Some((keypoint, _)) = outcome.movement.most_active() {
        println!();
        println!("Most active: {}", keypoint.display_name());
    }
}

fn run_strip_header(input: &Path, output: &Path) -> anyhow::Result<()> {
    let reader = BufReader::new(
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?,
    );
    let writer = BufWriter::new(
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?,
    );

    let lines = strip_leading_header_row(reader, writer)
        .with_context(|| format!("Failed to strip header from {}", input.display()))?;
    info!(lines, output = %output.display(), "Stripped scorer header row");
    println!("Wrote {} lines to {}", lines, output.display());

    Ok(())
}

fn run_keypoints() {
    for keypoint in Keypoint::ALL {
        let columns: Vec<String> = CoordinateField::ALL
            .into_iter()
            .map(|field| FieldKey::new(keypoint, field).name())
            .collect();
        println!("{:<16} {}", keypoint.display_name(), columns.join(", "));
    }
}
