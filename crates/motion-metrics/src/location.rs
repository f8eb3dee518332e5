//! Location metric over a keypoint's coordinate series.
//!
//! ## Cross-product form
//!
//! The default metric pairs every x sample with every y sample:
//!
//! `location[i·n + j] = |x[i]| + y[j]²`
//!
//! so `m` x values and `n` y values give `m·n` outputs, ordered with the
//! outer loop over x. This is not a per-frame distance; the same-frame
//! values sit on the diagonal `(i, i)`.
//!
//! ## Euclidean form
//!
//! Opt-in per-frame alternative: `sqrt(x[i]² + y[i]²)`, one value per frame.

use std::fmt;
use std::str::FromStr;

use motion_core::{Error, Result};
use ndarray::Array2;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize};

/// Largest window the cross-product metric accepts; the series holds
/// `window²` values per keypoint
pub const MAX_CROSS_PRODUCT_WINDOW: usize = 1_000;

/// Element cap for a materialized [`LocationSeries`]
pub const MAX_LOCATION_ELEMENTS: usize = MAX_CROSS_PRODUCT_WINDOW * MAX_CROSS_PRODUCT_WINDOW;

/// Cross-product location: `|xi| + yj²` for every `xi` in `x`, `yj` in `y`
pub fn calculate_location(x: &[f64], y: &[f64]) -> Vec<f64> {
    let mut location = Vec::with_capacity(x.len() * y.len());
    for xi in x {
        for yj in y {
            location.push(xi.abs() + yj.powi(2));
        }
    }
    location
}

/// Per-frame Euclidean distance from the image origin
pub fn euclidean_location(x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    if x.len() != y.len() {
        return Err(Error::ShapeMismatch {
            context: "euclidean location".into(),
            expected: x.len(),
            actual: y.len(),
        });
    }

    Ok(x.iter()
        .zip(y)
        .map(|(&xi, &yi)| nalgebra::Vector2::new(xi, yi).norm())
        .collect())
}

/// Which location metric to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMetric {
    /// `|x[i]| + y[j]²` over all (i, j) pairs
    #[default]
    CrossProduct,
    /// `sqrt(x[i]² + y[i]²)` per frame
    Euclidean,
}

impl LocationMetric {
    pub fn compute(&self, x: &[f64], y: &[f64]) -> Result<LocationSeries> {
        let elements = match self {
            LocationMetric::CrossProduct => x.len().checked_mul(y.len()).unwrap_or(usize::MAX),
            LocationMetric::Euclidean => x.len(),
        };
        if elements > MAX_LOCATION_ELEMENTS {
            return Err(Error::ShapeMismatch {
                context: format!("{} location series exceeds element limit", self),
                expected: MAX_LOCATION_ELEMENTS,
                actual: elements,
            });
        }

        let (shape, values) = match self {
            LocationMetric::CrossProduct => ((x.len(), y.len()), calculate_location(x, y)),
            LocationMetric::Euclidean => ((x.len(), 1), euclidean_location(x, y)?),
        };

        let actual = values.len();
        let values = Array2::from_shape_vec(shape, values).map_err(|_| Error::ShapeMismatch {
            context: "location series".into(),
            expected: shape.0 * shape.1,
            actual,
        })?;

        Ok(LocationSeries {
            metric: *self,
            values,
        })
    }

    /// Sum of every element of the series, without materializing it.
    ///
    /// For the cross product, `Σi Σj (|x[i]| + y[j]²) = n·Σ|x| + m·Σy²`.
    pub fn total(&self, x: &[f64], y: &[f64]) -> Result<f64> {
        match self {
            LocationMetric::CrossProduct => {
                let abs_x: f64 = x.iter().map(|v| v.abs()).sum();
                let sq_y: f64 = y.iter().map(|v| v.powi(2)).sum();
                Ok(y.len() as f64 * abs_x + x.len() as f64 * sq_y)
            }
            LocationMetric::Euclidean => Ok(euclidean_location(x, y)?.iter().sum()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LocationMetric::CrossProduct => "cross_product",
            LocationMetric::Euclidean => "euclidean",
        }
    }
}

impl fmt::Display for LocationMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LocationMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "cross_product" => Ok(LocationMetric::CrossProduct),
            "euclidean" => Ok(LocationMetric::Euclidean),
            other => Err(Error::Config(format!("unknown location metric '{}'", other))),
        }
    }
}

/// Location values of one keypoint.
///
/// Stored as an `(x samples) × (y samples)` matrix for the cross-product
/// metric and as a single column for the Euclidean one. Row-major
/// iteration gives the flat series order.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSeries {
    metric: LocationMetric,
    values: Array2<f64>,
}

impl LocationSeries {
    pub fn metric(&self) -> LocationMetric {
        self.metric
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Element `(i, j)`
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get((i, j)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// Sequential sum of every element
    pub fn total(&self) -> f64 {
        self.iter().sum()
    }

    /// Value pairing frame `i`'s own x and y samples
    pub fn frame_value(&self, i: usize) -> Option<f64> {
        match self.metric {
            LocationMetric::CrossProduct => self.get(i, i),
            LocationMetric::Euclidean => self.get(i, 0),
        }
    }
}

impl Serialize for LocationSeries {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let (rows, cols) = self.shape();
        let mut state = serializer.serialize_struct("LocationSeries", 3)?;
        state.serialize_field("metric", &self.metric)?;
        state.serialize_field("shape", &[rows, cols])?;
        state.serialize_field("values", &self.to_vec())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_product_example() {
        assert_eq!(
            calculate_location(&[1.0, 2.0], &[3.0, 4.0]),
            vec![10.0, 17.0, 11.0, 18.0]
        );
    }

    #[test]
    fn test_cross_product_shape_law() {
        let x = [-3.0, 0.5, 2.0];
        let y = [1.5, -2.0, 0.0, 4.0, -0.25];
        let series = LocationMetric::CrossProduct.compute(&x, &y).unwrap();

        assert_eq!(series.len(), x.len() * y.len());
        assert_eq!(series.shape(), (3, 5));
        let flat = series.to_vec();
        for (i, xi) in x.iter().enumerate() {
            for (j, yj) in y.iter().enumerate() {
                let expected = xi.abs() + yj * yj;
                assert!((flat[i * y.len() + j] - expected).abs() < 1e-12);
                assert_eq!(series.get(i, j), Some(flat[i * y.len() + j]));
            }
        }
    }

    #[test]
    fn test_unequal_lengths_allowed_for_cross_product() {
        let series = LocationMetric::CrossProduct.compute(&[1.0, 2.0, 3.0], &[1.0]).unwrap();
        assert_eq!(series.to_vec(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(calculate_location(&[], &[1.0, 2.0]).is_empty());
        assert!(calculate_location(&[1.0], &[]).is_empty());

        let series = LocationMetric::CrossProduct.compute(&[], &[]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.total(), 0.0);
    }

    #[test]
    fn test_frame_value_is_diagonal() {
        let series = LocationMetric::CrossProduct
            .compute(&[1.0, -2.0], &[3.0, 4.0])
            .unwrap();
        assert_eq!(series.frame_value(0), Some(10.0));
        assert_eq!(series.frame_value(1), Some(18.0));
        assert_eq!(series.frame_value(2), None);
    }

    #[test]
    fn test_euclidean_metric() {
        let series = LocationMetric::Euclidean
            .compute(&[3.0, 0.0], &[4.0, -2.0])
            .unwrap();
        assert_eq!(series.shape(), (2, 1));
        assert!((series.frame_value(0).unwrap() - 5.0).abs() < 1e-12);
        assert!((series.frame_value(1).unwrap() - 2.0).abs() < 1e-12);

        assert!(matches!(
            LocationMetric::Euclidean.compute(&[1.0], &[1.0, 2.0]),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_total_matches_materialized_sum() {
        let x = [-3.0, 0.5, 2.0, 7.25];
        let y = [1.5, -2.0, 0.0];
        for metric in [LocationMetric::CrossProduct, LocationMetric::Euclidean] {
            let y = if metric == LocationMetric::Euclidean { &x[..] } else { &y[..] };
            let expected: f64 = metric.compute(&x, y).unwrap().iter().sum();
            let total = metric.total(&x, y).unwrap();
            assert!((total - expected).abs() < 1e-9, "{}: {} vs {}", metric, total, expected);
        }

        assert_eq!(LocationMetric::CrossProduct.total(&[], &[1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_oversized_series_rejected() {
        let long = vec![1.0; MAX_CROSS_PRODUCT_WINDOW + 1];
        assert!(matches!(
            LocationMetric::CrossProduct.compute(&long, &long),
            Err(Error::ShapeMismatch { expected: MAX_LOCATION_ELEMENTS, .. })
        ));

        // Totals never build the series
        let total = LocationMetric::CrossProduct.total(&long, &long).unwrap();
        assert_eq!(total, 2.0 * (long.len() * long.len()) as f64);

        // The per-frame metric stays linear
        assert!(LocationMetric::Euclidean.compute(&long, &long).is_ok());
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!(
            "cross-product".parse::<LocationMetric>().unwrap(),
            LocationMetric::CrossProduct
        );
        assert_eq!(
            "Euclidean".parse::<LocationMetric>().unwrap(),
            LocationMetric::Euclidean
        );
        assert!("manhattan".parse::<LocationMetric>().is_err());
    }
}
