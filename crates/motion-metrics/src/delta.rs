//! Frame-to-frame coordinate deltas.
//!
//! Deltas are backward differences: row `i` holds `value[i] - value[i+1]`,
//! pointing from each frame toward its successor. The last frame has no
//! successor and is dropped, so the output is one row shorter.

use std::collections::BTreeMap;

use motion_core::{CleanedTable, DeltaTable, Error, FieldKey, FrameTable, Keypoint, Result};
use tracing::debug;

/// `values[i] - values[i + 1]` for every `i` but the last
pub fn backward_difference(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[0] - w[1]).collect()
}

/// Computes the [`DeltaTable`] of a [`CleanedTable`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaComputer;

impl DeltaComputer {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, table: &CleanedTable) -> Result<DeltaTable> {
        for keypoint in Keypoint::ALL {
            let (x, y) = (table.x(keypoint)?, table.y(keypoint)?);
            if x.len() != y.len() {
                return Err(Error::ShapeMismatch {
                    context: format!("{} delta input", keypoint),
                    expected: x.len(),
                    actual: y.len(),
                });
            }
        }

        // Each delta row keeps the frame index of its left operand
        let rows = table.len().saturating_sub(1);
        let frames = table.frames()[..rows].to_vec();

        let columns: BTreeMap<FieldKey, Vec<f64>> = table
            .columns()
            .map(|(key, values)| (*key, backward_difference(values)))
            .collect();

        let deltas = DeltaTable::new(FrameTable::new(frames, columns)?)?;
        debug!(rows = deltas.len(), "Computed frame deltas");
        Ok(deltas)
    }
}
