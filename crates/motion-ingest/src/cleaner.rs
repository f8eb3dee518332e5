//! Field cleaning: geometry only, bounded analysis window.

use motion_core::{is_likelihood, CleanedTable, Error, Result, TrajectoryTable};
use tracing::debug;

/// Default number of leading frames kept for analysis
pub const DEFAULT_ANALYSIS_WINDOW_FRAMES: usize = 350;

/// Drops likelihood columns and truncates to the analysis window
#[derive(Debug, Clone)]
pub struct FieldCleaner {
    /// Maximum number of leading frames to keep
    pub analysis_window_frames: usize,
}

impl Default for FieldCleaner {
    fn default() -> Self {
        Self {
            analysis_window_frames: DEFAULT_ANALYSIS_WINDOW_FRAMES,
        }
    }
}

impl FieldCleaner {
    pub fn new(analysis_window_frames: usize) -> Self {
        Self {
            analysis_window_frames,
        }
    }

    /// Produce the cleaned table.
    ///
    /// Shorter inputs are kept whole. Columns come out in lexicographic
    /// order of their composite names.
    pub fn clean(&self, table: &TrajectoryTable) -> Result<CleanedTable> {
        let cleaned = table
            .without_columns(is_likelihood)
            .head(self.analysis_window_frames);

        if cleaned.is_empty() {
            return Err(Error::EmptyInput(format!(
                "no frames left after cleaning (window = {})",
                self.analysis_window_frames
            )));
        }

        debug!(
            input_rows = table.len(),
            rows = cleaned.len(),
            columns = cleaned.column_count(),
            "Cleaned trajectory table"
        );

        CleanedTable::new(cleaned)
    }
}
