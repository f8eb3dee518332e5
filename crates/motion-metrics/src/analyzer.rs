//! Pipeline orchestration: ingest, clean, locate, difference, aggregate.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use motion_core::{CleanedTable, DeltaTable, Result, RunId, TrajectoryTable};
use motion_ingest::{DataIngestor, FieldCleaner};
use serde::Serialize;
use tracing::{error, info};

use crate::config::AnalysisConfig;
use crate::delta::DeltaComputer;
use crate::location::LocationMetric;
use crate::movement::{MovementAggregator, MovementTotals};
use crate::presentation::{PresentationData, Presenter};

/// Pipeline stage, used to attribute failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Ingest,
    Clean,
    Delta,
    Movement,
    Presentation,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineStage::Ingest => "ingest",
            PipelineStage::Clean => "clean",
            PipelineStage::Delta => "delta",
            PipelineStage::Movement => "movement",
            PipelineStage::Presentation => "presentation",
        })
    }
}

/// Log the failing stage and pass the error through unchanged
fn in_stage<T>(stage: PipelineStage, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        error!(stage = %stage, "Pipeline stage failed: {}", e);
    }
    result
}

/// Every table produced by one run
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub ingested_rows: usize,
    pub cleaned: CleanedTable,
    pub deltas: DeltaTable,
    pub movement: MovementTotals,
    pub presentation: PresentationData,
}

/// Runs the full metric pipeline
#[derive(Debug, Clone)]
pub struct MotionAnalyzer {
    config: AnalysisConfig,
    ingestor: DataIngestor,
    cleaner: FieldCleaner,
    deltas: DeltaComputer,
    aggregator: MovementAggregator,
    presenter: Presenter,
}

impl MotionAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;

        if config.location_metric == LocationMetric::Euclidean {
            info!("Using per-frame euclidean location metric instead of the cross-product form");
        }

        Ok(Self {
            ingestor: DataIngestor::new().with_layout(config.header_layout),
            cleaner: FieldCleaner::new(config.analysis_window_frames),
            deltas: DeltaComputer::new(),
            aggregator: MovementAggregator::new(config.location_metric),
            presenter: Presenter::new(config.location_metric, config.scatter_keypoint),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze_path(&self, path: impl AsRef<Path>) -> Result<AnalysisOutcome> {
        let table = in_stage(PipelineStage::Ingest, self.ingestor.ingest_path(path))?;
        self.analyze(&table)
    }

    pub fn analyze_reader<R: Read>(&self, reader: R) -> Result<AnalysisOutcome> {
        let table = in_stage(PipelineStage::Ingest, self.ingestor.ingest_reader(reader))?;
        self.analyze(&table)
    }

    /// Run every stage after ingestion
    pub fn analyze(&self, table: &TrajectoryTable) -> Result<AnalysisOutcome> {
        let cleaned = in_stage(PipelineStage::Clean, self.cleaner.clean(table))?;
        if cleaned.len() < table.len() {
            info!(
                kept = cleaned.len(),
                dropped = table.len() - cleaned.len(),
                "Truncated to analysis window"
            );
        }

        let deltas = in_stage(PipelineStage::Delta, self.deltas.compute(&cleaned))?;
        let movement = in_stage(PipelineStage::Movement, self.aggregator.aggregate(&deltas))?;
        let presentation = in_stage(
            PipelineStage::Presentation,
            self.presenter.build(&cleaned, &movement),
        )?;

        info!(
            frames = cleaned.len(),
            deltas = deltas.len(),
            metric = %self.config.location_metric,
            "Movement analysis complete"
        );

        Ok(AnalysisOutcome {
            ingested_rows: table.len(),
            cleaned,
            deltas,
            movement,
            presentation,
        })
    }
}

/// Row counts at each stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameCounts {
    pub ingested: usize,
    pub cleaned: usize,
    pub deltas: usize,
}

/// Serializable summary of one run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub run_id: RunId,
    pub generated_at: DateTime<Utc>,
    pub input: Option<PathBuf>,
    pub config: AnalysisConfig,
    pub frames: FrameCounts,
    pub movement: MovementTotals,
    pub presentation: PresentationData,
}

impl AnalysisOutcome {
    pub fn frame_counts(&self) -> FrameCounts {
        FrameCounts {
            ingested: self.ingested_rows,
            cleaned: self.cleaned.len(),
            deltas: self.deltas.len(),
        }
    }

    pub fn report(&self, config: &AnalysisConfig, input: Option<&Path>) -> AnalysisReport {
        AnalysisReport {
            run_id: RunId::new(),
            generated_at: Utc::now(),
            input: input.map(Path::to_path_buf),
            config: config.clone(),
            frames: self.frame_counts(),
            movement: self.movement.clone(),
            presentation: self.presentation.clone(),
        }
    }
}

impl AnalysisReport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(writer, self)?;
        info!(path = %path.as_ref().display(), run_id = %self.run_id, "Wrote analysis report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_core::{Error, Keypoint};

    /// Nosetip walks the diagonal, every other keypoint stays put
    fn csv(rows: usize) -> String {
        let keypoints = Keypoint::ALL;
        let mut outer = vec!["bodyparts"];
        let mut inner = vec!["coords"];
        for kp in &keypoints {
            outer.extend([kp.label(); 3]);
            inner.extend(["x", "y", "likelihood"]);
        }

        let mut out = format!("{}\n{}\n", outer.join(","), inner.join(","));
        for frame in 0..rows {
            let mut cells = vec![frame.to_string()];
            for kp in &keypoints {
                let (x, y) = match kp {
                    Keypoint::Nosetip => (frame as f64, frame as f64),
                    Keypoint::RightWhiskers => (5.0, 0.0),
                    _ => (1.0, 1.0),
                };
                cells.extend([x.to_string(), y.to_string(), "1.0".to_string()]);
            }
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_three_frame_pipeline() {
        let analyzer = MotionAnalyzer::new(AnalysisConfig::default()).unwrap();
        let outcome = analyzer.analyze_reader(csv(3).as_bytes()).unwrap();

        assert_eq!(
            outcome.frame_counts(),
            FrameCounts {
                ingested: 3,
                cleaned: 3,
                deltas: 2
            }
        );
        assert_eq!(outcome.movement.get(Keypoint::Nosetip), 8.0);
        assert_eq!(outcome.movement.get(Keypoint::RightWhiskers), 0.0);
        assert_eq!(outcome.movement.get(Keypoint::LeftEar), 0.0);
    }

    #[test]
    fn test_window_applies_before_deltas() {
        let config = AnalysisConfig {
            analysis_window_frames: 4,
            ..Default::default()
        };
        let outcome = MotionAnalyzer::new(config)
            .unwrap()
            .analyze_reader(csv(10).as_bytes())
            .unwrap();

        assert_eq!(outcome.cleaned.len(), 4);
        assert_eq!(outcome.deltas.len(), 3);
        // 3 deltas of (-1, -1) cross to 9 elements of 2
        assert_eq!(outcome.movement.get(Keypoint::Nosetip), 18.0);
    }

    #[test]
    fn test_errors_pass_through_unchanged() {
        let analyzer = MotionAnalyzer::new(AnalysisConfig::default()).unwrap();
        let truncated: String = csv(2).lines().take(2).map(|l| format!("{}\n", l)).collect();
        assert!(matches!(
            analyzer.analyze_reader(truncated.as_bytes()),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalysisConfig {
            analysis_window_frames: 0,
            ..Default::default()
        };
        assert!(matches!(MotionAnalyzer::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_oversized_window_fails_before_ingest() {
        let config = AnalysisConfig {
            analysis_window_frames: 100_000,
            ..Default::default()
        };
        assert!(matches!(MotionAnalyzer::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_report_json() {
        let config = AnalysisConfig::default();
        let outcome = MotionAnalyzer::new(config.clone())
            .unwrap()
            .analyze_reader(csv(3).as_bytes())
            .unwrap();
        let report = outcome.report(&config, Some(Path::new("shrew.csv")));
        let json: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

        assert_eq!(json["frames"]["deltas"], 2);
        assert_eq!(json["movement"]["totals"]["Nosetip"], 8.0);
        assert_eq!(json["config"]["location_metric"], "cross_product");
        assert_eq!(json["input"], "shrew.csv");
    }
}
