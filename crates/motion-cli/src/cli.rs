//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use motion_core::Keypoint;
use motion_metrics::LocationMetric;

/// Keypoint Motion - location and movement metrics from pose-estimation CSV
#[derive(Parser, Debug)]
#[command(name = "keypoint-motion")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (JSON, TOML or YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute location and movement metrics for a coordinate table
    Analyze {
        /// Coordinate table exported by the pose-estimation tool
        #[arg(short, long)]
        input: PathBuf,

        /// Input still carries the leading scorer header row
        #[arg(long)]
        raw: bool,

        /// Number of leading frames to analyze
        #[arg(short, long)]
        window: Option<usize>,

        /// Location metric: cross-product or euclidean
        #[arg(short, long)]
        metric: Option<LocationMetric>,

        /// Keypoint shown in the 3D scatter
        #[arg(long)]
        scatter_keypoint: Option<Keypoint>,

        /// Write the full JSON report here
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Remove the leading scorer header row from a raw export
    StripHeader {
        /// Raw export with three header rows
        #[arg(short, long)]
        input: PathBuf,

        /// Destination for the two-row header table
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the tracked keypoints and their columns
    Keypoints,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "keypoint-motion",
            "analyze",
            "--input",
            "shrew.csv",
            "--window",
            "120",
            "--metric",
            "euclidean",
            "--scatter-keypoint",
            "rightear",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze {
                input,
                window,
                metric,
                scatter_keypoint,
                raw,
                report,
            } => {
                assert_eq!(input, PathBuf::from("shrew.csv"));
                assert_eq!(window, Some(120));
                assert_eq!(metric, Some(LocationMetric::Euclidean));
                assert_eq!(scatter_keypoint, Some(Keypoint::RightEar));
                assert!(!raw);
                assert!(report.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_keypoint_rejected() {
        let result = Cli::try_parse_from([
            "keypoint-motion",
            "analyze",
            "--input",
            "shrew.csv",
            "--scatter-keypoint",
            "tail",
        ]);
        assert!(result.is_err());
    }
}
