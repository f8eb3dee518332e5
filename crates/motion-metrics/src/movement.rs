//! Total movement per keypoint.
//!
//! The location metric is applied to each keypoint's delta-x and delta-y
//! series and every element of the result is summed into one scalar.

use std::collections::BTreeMap;

use motion_core::{DeltaTable, Error, Keypoint, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::location::LocationMetric;

/// One movement scalar per enumerated keypoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementTotals {
    totals: BTreeMap<Keypoint, f64>,
}

impl MovementTotals {
    pub fn get(&self, keypoint: Keypoint) -> f64 {
        self.totals.get(&keypoint).copied().unwrap_or(0.0)
    }

    /// Totals in keypoint enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (Keypoint, f64)> + '_ {
        self.totals.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Keypoint with the largest total
    pub fn most_active(&self) -> Option<(Keypoint, f64)> {
        self.iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }
}

/// Reduces a [`DeltaTable`] to [`MovementTotals`]
#[derive(Debug, Clone, Default)]
pub struct MovementAggregator {
    pub metric: LocationMetric,
}

impl MovementAggregator {
    pub fn new(metric: LocationMetric) -> Self {
        Self { metric }
    }

    pub fn aggregate(&self, deltas: &DeltaTable) -> Result<MovementTotals> {
        let mut totals = BTreeMap::new();

        for keypoint in Keypoint::ALL {
            let (dx, dy) = (deltas.dx(keypoint)?, deltas.dy(keypoint)?);
            if dx.len() != dy.len() {
                return Err(Error::ShapeMismatch {
                    context: format!("{} movement", keypoint),
                    expected: dx.len(),
                    actual: dy.len(),
                });
            }

            let total = self.metric.total(dx, dy)?;
            debug!(keypoint = %keypoint, deltas = dx.len(), total, "Aggregated movement");
            totals.insert(keypoint, total);
        }

        Ok(MovementTotals { totals })
    }
}
