//! Fundamental types for keypoint motion analysis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Unique identifier for one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Zero-based video frame index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Frame(pub u64);

impl Frame {
    pub fn index(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Tracked anatomical landmark.
///
/// The set is fixed: a table carrying any other keypoint is rejected at
/// ingestion. Declaration order is the enumeration order used for movement
/// totals and chart bars.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Keypoint {
    #[default]
    #[serde(rename = "Nosetip")]
    Nosetip,
    #[serde(rename = "rightwhiskers")]
    RightWhiskers,
    #[serde(rename = "leftwhiskers")]
    LeftWhiskers,
    #[serde(rename = "rightear")]
    RightEar,
    #[serde(rename = "leftear")]
    LeftEar,
}

impl Keypoint {
    pub const COUNT: usize = 5;

    pub const ALL: [Keypoint; Keypoint::COUNT] = [
        Keypoint::Nosetip,
        Keypoint::RightWhiskers,
        Keypoint::LeftWhiskers,
        Keypoint::RightEar,
        Keypoint::LeftEar,
    ];

    /// Column label as written by the pose-estimation tool
    pub fn label(&self) -> &'static str {
        match self {
            Keypoint::Nosetip => "Nosetip",
            Keypoint::RightWhiskers => "rightwhiskers",
            Keypoint::LeftWhiskers => "leftwhiskers",
            Keypoint::RightEar => "rightear",
            Keypoint::LeftEar => "leftear",
        }
    }

    /// Human-readable name for chart labels
    pub fn display_name(&self) -> &'static str {
        match self {
            Keypoint::Nosetip => "Nose tip",
            Keypoint::RightWhiskers => "right whiskers",
            Keypoint::LeftWhiskers => "left whiskers",
            Keypoint::RightEar => "right ear",
            Keypoint::LeftEar => "left ear",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }

    pub fn x(self) -> FieldKey {
        FieldKey::new(self, CoordinateField::X)
    }

    pub fn y(self) -> FieldKey {
        FieldKey::new(self, CoordinateField::Y)
    }

    pub fn likelihood(self) -> FieldKey {
        FieldKey::new(self, CoordinateField::Likelihood)
    }
}

impl fmt::Display for Keypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Keypoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
            .ok_or_else(|| Error::MalformedInput(format!("unknown keypoint '{}'", s)))
    }
}

/// Per-keypoint raw field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateField {
    /// Horizontal pixel coordinate
    X,
    /// Vertical pixel coordinate
    Y,
    /// Detection confidence in [0, 1]
    Likelihood,
}

impl CoordinateField {
    pub const ALL: [CoordinateField; 3] = [
        CoordinateField::X,
        CoordinateField::Y,
        CoordinateField::Likelihood,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CoordinateField::X => "x",
            CoordinateField::Y => "y",
            CoordinateField::Likelihood => "likelihood",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }

    /// Geometry fields survive cleaning; likelihood does not
    pub fn is_geometry(&self) -> bool {
        !matches!(self, CoordinateField::Likelihood)
    }
}

impl fmt::Display for CoordinateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Composite column name `<keypoint>_<field>`.
///
/// Ordering follows the rendered name byte-wise, so a sorted set of keys
/// is the lexicographic column order of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub keypoint: Keypoint,
    pub field: CoordinateField,
}

impl FieldKey {
    pub fn new(keypoint: Keypoint, field: CoordinateField) -> Self {
        Self { keypoint, field }
    }

    /// Parse a flattened composite label such as `rightear_likelihood`
    pub fn parse(name: &str) -> Option<Self> {
        let (keypoint, field) = name.rsplit_once('_')?;
        Some(Self::new(
            Keypoint::from_label(keypoint)?,
            CoordinateField::from_label(field)?,
        ))
    }

    /// Every composite key of the fixed keypoint set (15 keys)
    pub fn all() -> impl Iterator<Item = FieldKey> {
        Keypoint::ALL.into_iter().flat_map(|keypoint| {
            CoordinateField::ALL
                .into_iter()
                .map(move |field| FieldKey::new(keypoint, field))
        })
    }

    pub fn name(&self) -> String {
        format!("{}_{}", self.keypoint.label(), self.field.label())
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.keypoint.label(), self.field.label())
    }
}

impl Ord for FieldKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name().cmp(&other.name())
    }
}

impl PartialOrd for FieldKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for FieldKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        FieldKey::parse(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown field '{}'", name)))
    }
}
