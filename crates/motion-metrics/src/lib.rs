//! # Motion-Metrics
//!
//! Location and movement metrics for pose-estimation keypoint tracks.
//!
//! ## Data flow
//!
//! ```text
//! TrajectoryTable ─▶ FieldCleaner ─▶ CleanedTable ─┬─▶ LocationMetric ─▶ timeline / scatter
//!                                                  └─▶ DeltaComputer ─▶ DeltaTable ─▶ MovementAggregator
//! ```
//!
//! The location metric defaults to the cross-product form
//! `|x[i]| + y[j]²` over every `(i, j)` pair (see [`location`]). Deltas are
//! backward differences `value[i] - value[i+1]`, and a keypoint's movement
//! total is the sum of the location metric over its deltas.

pub mod analyzer;
pub mod config;
pub mod delta;
pub mod location;
pub mod movement;
pub mod presentation;

pub use analyzer::*;
pub use config::*;
pub use delta::*;
pub use location::*;
pub use movement::*;
pub use presentation::*;
