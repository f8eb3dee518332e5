//! Coordinate table ingestion.
//!
//! Parses the pose-estimation CSV into a [`TrajectoryTable`]: header rows
//! are flattened into composite field names, column 0 becomes the frame
//! index and every other cell must be a number.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use motion_core::{
    CoordinateField, Error, FieldKey, Frame, FrameTable, Result, TrajectoryTable,
};
use tracing::{debug, warn};

use crate::header::{flatten_header, HeaderLayout};

/// Reads coordinate tables into [`TrajectoryTable`]s
#[derive(Debug, Clone, Default)]
pub struct DataIngestor {
    pub layout: HeaderLayout,
}

impl DataIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the expected header layout
    pub fn with_layout(mut self, layout: HeaderLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Read and parse the table at `path`
    pub fn ingest_path(&self, path: impl AsRef<Path>) -> Result<TrajectoryTable> {
        let path = path.as_ref();
        debug!(path = %path.display(), layout = ?self.layout, "Opening coordinate table");
        let file = File::open(path)?;
        self.ingest_reader(file)
    }

    /// Parse a table from any byte source
    pub fn ingest_reader<R: Read>(&self, reader: R) -> Result<TrajectoryTable> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut records = rdr.records();

        // Header rows
        let mut header = Vec::with_capacity(self.layout.header_rows());
        for row in 0..self.layout.header_rows() {
            match records.next() {
                Some(rec) => header.push(rec?),
                None => {
                    return Err(Error::MalformedInput(format!(
                        "expected {} header rows, found {}",
                        self.layout.header_rows(),
                        row
                    )))
                }
            }
        }
        let skip = self.layout.discarded_rows();
        let keys = flatten_header(&header[skip], &header[skip + 1])?;
        check_required_fields(&keys)?;

        let width = keys.len() + 1;
        let mut frames = Vec::new();
        let mut values: Vec<Vec<f64>> = vec![Vec::new(); keys.len()];

        for (idx, rec) in records.enumerate() {
            let line = idx + self.layout.header_rows() + 1;
            let rec = rec?;

            if rec.len() != width {
                return Err(Error::MalformedInput(format!(
                    "line {}: expected {} cells, got {}",
                    line,
                    width,
                    rec.len()
                )));
            }

            let frame = parse_frame(&rec, line)?;
            if let Some(prev) = frames.last() {
                if frame <= *prev {
                    return Err(Error::MalformedInput(format!(
                        "line {}: frame {} is not after frame {}",
                        line, frame, prev
                    )));
                }
            }
            frames.push(frame);

            for (col, key) in keys.iter().enumerate() {
                let value = parse_value(&rec, col + 1, line)?;
                if key.field == CoordinateField::Likelihood && !(0.0..=1.0).contains(&value) {
                    return Err(Error::MalformedInput(format!(
                        "line {}: {} = {} is outside [0, 1]",
                        line, key, value
                    )));
                }
                values[col].push(value);
            }
        }

        if frames.is_empty() {
            return Err(Error::EmptyInput("coordinate table has no data rows".into()));
        }

        let gaps = frames.windows(2).filter(|w| w[1].0 != w[0].0 + 1).count();
        if gaps > 0 {
            warn!(gaps, "Frame index is not contiguous");
        }

        let columns: BTreeMap<FieldKey, Vec<f64>> = keys.into_iter().zip(values).collect();
        let table = TrajectoryTable::new(FrameTable::new(frames, columns)?)?;

        debug!(
            rows = table.len(),
            columns = table.column_count(),
            "Ingested trajectory table"
        );

        Ok(table)
    }
}

/// Every enumerated keypoint must carry x, y and likelihood
fn check_required_fields(keys: &[FieldKey]) -> Result<()> {
    let missing: Vec<String> = FieldKey::all()
        .filter(|k| !keys.contains(k))
        .map(|k| k.name())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MalformedInput(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}

fn parse_frame(rec: &StringRecord, line: usize) -> Result<Frame> {
    let cell = rec.get(0).unwrap_or_default();
    cell.parse::<u64>().map(Frame).map_err(|_| {
        Error::MalformedInput(format!("line {}: frame index '{}' is not an integer", line, cell))
    })
}

fn parse_value(rec: &StringRecord, idx: usize, line: usize) -> Result<f64> {
    let cell = rec.get(idx).unwrap_or_default();
    cell.parse::<f64>().map_err(|_| {
        Error::MalformedInput(format!(
            "line {}: cell {} value '{}' is not a number",
            line, idx, cell
        ))
    })
}
