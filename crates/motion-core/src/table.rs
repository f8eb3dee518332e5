//! Frame-indexed keypoint tables.
//!
//! A [`FrameTable`] is a column store: one `f64` series per composite
//! field, all aligned to the same strictly increasing frame index. The
//! stage newtypes wrap it and pin down which columns are allowed.

use std::collections::BTreeMap;
use std::ops::Deref;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{CoordinateField, FieldKey, Frame, Keypoint};

/// Frame-indexed column store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameTable {
    frames: Vec<Frame>,
    columns: BTreeMap<FieldKey, Vec<f64>>,
}

impl FrameTable {
    /// Build a table, checking that every column has one value per frame
    pub fn new(frames: Vec<Frame>, columns: BTreeMap<FieldKey, Vec<f64>>) -> Result<Self> {
        for (key, values) in &columns {
            if values.len() != frames.len() {
                return Err(Error::ShapeMismatch {
                    context: format!("column {}", key),
                    expected: frames.len(),
                    actual: values.len(),
                });
            }
        }

        Ok(Self { frames, columns })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of rows (frames)
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column keys in lexicographic order of their composite names
    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.columns.keys()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().map(FieldKey::name).collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&FieldKey, &[f64])> {
        self.columns.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn column(&self, key: FieldKey) -> Option<&[f64]> {
        self.columns.get(&key).map(Vec::as_slice)
    }

    /// Column lookup that treats absence as malformed input
    pub fn series(&self, key: FieldKey) -> Result<&[f64]> {
        self.column(key)
            .ok_or_else(|| Error::MalformedInput(format!("missing column {}", key)))
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.columns.contains_key(&key)
    }

    /// Value at row `row` of column `key`
    pub fn value(&self, row: usize, key: FieldKey) -> Option<f64> {
        self.columns.get(&key)?.get(row).copied()
    }

    /// Drop every column whose key matches `predicate`
    pub fn without_columns<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&FieldKey) -> bool,
    {
        Self {
            frames: self.frames.clone(),
            columns: self
                .columns
                .iter()
                .filter(|(k, _)| !predicate(k))
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
        }
    }

    /// Keep at most the first `rows` frames
    pub fn head(&self, rows: usize) -> Self {
        let n = rows.min(self.frames.len());
        Self {
            frames: self.frames[..n].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(k, v)| (*k, v[..n].to_vec()))
                .collect(),
        }
    }

    fn check_schema(&self, expected: &[FieldKey], table: &str) -> Result<()> {
        for key in expected {
            if !self.columns.contains_key(key) {
                return Err(Error::MalformedInput(format!(
                    "{} is missing column {}",
                    table, key
                )));
            }
        }

        if let Some(extra) = self.columns.keys().find(|k| !expected.contains(k)) {
            return Err(Error::MalformedInput(format!(
                "{} has unexpected column {}",
                table, extra
            )));
        }

        Ok(())
    }

    fn check_frames(&self, table: &str) -> Result<()> {
        for pair in self.frames.windows(2) {
            if pair[1] <= pair[0] {
                return Err(Error::MalformedInput(format!(
                    "{} frame index {} follows {}; frames must be strictly increasing",
                    table, pair[1], pair[0]
                )));
            }
        }
        Ok(())
    }
}

fn geometry_keys() -> Vec<FieldKey> {
    FieldKey::all().filter(|k| k.field.is_geometry()).collect()
}

/// Ingested table: all five keypoints with x, y and likelihood
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryTable(FrameTable);

impl TrajectoryTable {
    pub fn new(table: FrameTable) -> Result<Self> {
        let expected: Vec<FieldKey> = FieldKey::all().collect();
        table.check_schema(&expected, "trajectory table")?;
        table.check_frames("trajectory table")?;
        Ok(Self(table))
    }

    pub fn into_inner(self) -> FrameTable {
        self.0
    }
}

impl Deref for TrajectoryTable {
    type Target = FrameTable;

    fn deref(&self) -> &FrameTable {
        &self.0
    }
}

/// Geometry-only table restricted to the analysis window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedTable(FrameTable);

impl CleanedTable {
    pub fn new(table: FrameTable) -> Result<Self> {
        table.check_schema(&geometry_keys(), "cleaned table")?;
        table.check_frames("cleaned table")?;
        Ok(Self(table))
    }

    pub fn x(&self, keypoint: Keypoint) -> Result<&[f64]> {
        self.0.series(keypoint.x())
    }

    pub fn y(&self, keypoint: Keypoint) -> Result<&[f64]> {
        self.0.series(keypoint.y())
    }

    pub fn into_inner(self) -> FrameTable {
        self.0
    }
}

impl Deref for CleanedTable {
    type Target = FrameTable;

    fn deref(&self) -> &FrameTable {
        &self.0
    }
}

/// Backward frame differences of a [`CleanedTable`], one row shorter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaTable(FrameTable);

impl DeltaTable {
    pub fn new(table: FrameTable) -> Result<Self> {
        table.check_schema(&geometry_keys(), "delta table")?;
        table.check_frames("delta table")?;
        Ok(Self(table))
    }

    pub fn dx(&self, keypoint: Keypoint) -> Result<&[f64]> {
        self.0.series(keypoint.x())
    }

    pub fn dy(&self, keypoint: Keypoint) -> Result<&[f64]> {
        self.0.series(keypoint.y())
    }

    pub fn into_inner(self) -> FrameTable {
        self.0
    }
}

impl Deref for DeltaTable {
    type Target = FrameTable;

    fn deref(&self) -> &FrameTable {
        &self.0
    }
}

/// Whether a column survives cleaning
pub fn is_likelihood(key: &FieldKey) -> bool {
    key.field == CoordinateField::Likelihood
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: u64) -> Vec<Frame> {
        (0..n).map(Frame).collect()
    }

    fn full_columns(n: usize) -> BTreeMap<FieldKey, Vec<f64>> {
        FieldKey::all().map(|k| (k, vec![0.5; n])).collect()
    }

    #[test]
    fn test_column_length_checked() {
        let mut columns = BTreeMap::new();
        columns.insert(Keypoint::Nosetip.x(), vec![1.0, 2.0]);
        let err = FrameTable::new(frames(3), columns).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_trajectory_schema() {
        let table = FrameTable::new(frames(4), full_columns(4)).unwrap();
        assert!(TrajectoryTable::new(table.clone()).is_ok());

        let missing = table.without_columns(|k| *k == Keypoint::LeftEar.y());
        assert!(matches!(
            TrajectoryTable::new(missing),
            Err(Error::MalformedInput(_))
        ));

        // A cleaned table must not carry likelihood columns
        assert!(matches!(
            CleanedTable::new(table),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_frames_strictly_increasing() {
        let table =
            FrameTable::new(vec![Frame(0), Frame(2), Frame(2)], full_columns(3)).unwrap();
        assert!(matches!(
            TrajectoryTable::new(table),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_head_and_projection() {
        let table = FrameTable::new(frames(5), full_columns(5)).unwrap();
        let cleaned = table.without_columns(is_likelihood).head(3);

        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned.column_count(), 10);
        assert!(cleaned.keys().all(|k| !is_likelihood(k)));

        // Asking for more rows than exist keeps them all
        assert_eq!(table.head(100).len(), 5);
    }
}
