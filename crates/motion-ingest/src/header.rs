//! Header normalization and flattening.
//!
//! The pose-estimation tool writes three header rows (`scorer`,
//! `bodyparts`, `coords`). Downstream tooling usually strips the scorer row
//! first, leaving two. Either way the last two header rows are flattened
//! into one composite `<keypoint>_<field>` name per data column.

use std::io::{BufRead, Write};

use csv::StringRecord;
use motion_core::{CoordinateField, Error, FieldKey, Keypoint, Result};
use serde::{Deserialize, Serialize};

/// Header rows present in the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLayout {
    /// Two rows: outer label (scorer or keypoint) and inner label
    #[default]
    Flattened,
    /// The tool's native three rows; the leading scorer row is discarded
    Raw,
}

impl HeaderLayout {
    pub fn header_rows(&self) -> usize {
        match self {
            HeaderLayout::Flattened => 2,
            HeaderLayout::Raw => 3,
        }
    }

    /// Leading header rows that carry no column information
    pub fn discarded_rows(&self) -> usize {
        self.header_rows() - 2
    }
}

/// Flatten one data column's two header labels into a composite key.
///
/// An inner label that is already `<keypoint>_<field>` wins and the outer
/// label is treated as a scorer name. Otherwise the outer label must be a
/// keypoint and the inner label a field.
pub fn flatten_label(outer: &str, inner: &str) -> Option<FieldKey> {
    if let Some(key) = FieldKey::parse(inner) {
        return Some(key);
    }

    Some(FieldKey::new(
        Keypoint::from_label(outer)?,
        CoordinateField::from_label(inner)?,
    ))
}

/// Flatten both header records, skipping the leading index column
pub fn flatten_header(outer: &StringRecord, inner: &StringRecord) -> Result<Vec<FieldKey>> {
    if outer.len() != inner.len() {
        return Err(Error::MalformedInput(format!(
            "header rows disagree on column count: {} vs {}",
            outer.len(),
            inner.len()
        )));
    }

    if outer.len() < 2 {
        return Err(Error::MalformedInput(
            "header has no data columns after the frame index".into(),
        ));
    }

    let mut keys = Vec::with_capacity(outer.len() - 1);
    for (col, (o, i)) in outer.iter().zip(inner.iter()).enumerate().skip(1) {
        let key = flatten_label(o, i).ok_or_else(|| {
            Error::MalformedInput(format!(
                "column {} header ('{}', '{}') is not a known <keypoint>_<field>",
                col, o, i
            ))
        })?;

        if keys.contains(&key) {
            return Err(Error::MalformedInput(format!(
                "column {} duplicates field {}",
                col, key
            )));
        }
        keys.push(key);
    }

    Ok(keys)
}

/// Copy `reader` to `writer` without its first line.
///
/// Turns the tool's native export into the two-header-row layout. Returns
/// the number of lines written.
pub fn strip_leading_header_row<R: BufRead, W: Write>(reader: R, mut writer: W) -> Result<usize> {
    let mut written = 0;
    for line in reader.lines().skip(1) {
        writeln!(writer, "{}", line?)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
