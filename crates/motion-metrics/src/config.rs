//! Analysis configuration.

use std::path::Path;

use motion_core::{Error, Keypoint, Result};
use motion_ingest::{HeaderLayout, DEFAULT_ANALYSIS_WINDOW_FRAMES};
use serde::{Deserialize, Serialize};

use crate::location::{LocationMetric, MAX_CROSS_PRODUCT_WINDOW};

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of leading frames kept by the cleaner
    pub analysis_window_frames: usize,

    /// Location metric used for the timeline and movement totals
    pub location_metric: LocationMetric,

    /// Header rows present in the input file
    pub header_layout: HeaderLayout,

    /// Keypoint plotted in the 3D scatter
    pub scatter_keypoint: Keypoint,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            analysis_window_frames: DEFAULT_ANALYSIS_WINDOW_FRAMES,
            location_metric: LocationMetric::CrossProduct,
            header_layout: HeaderLayout::Flattened,
            scatter_keypoint: Keypoint::Nosetip,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from file, with `MOTION_*` environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("MOTION").try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("MOTION").try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.analysis_window_frames == 0 {
            return Err(Error::Config(
                "analysis_window_frames must be at least 1".into(),
            ));
        }

        if self.location_metric == LocationMetric::CrossProduct
            && self.analysis_window_frames > MAX_CROSS_PRODUCT_WINDOW
        {
            return Err(Error::Config(format!(
                "analysis_window_frames = {} exceeds {} for the cross_product metric",
                self.analysis_window_frames, MAX_CROSS_PRODUCT_WINDOW
            )));
        }
        Ok(())
    }
}
