//! # Motion-Core
//!
//! Core types and utilities for deriving location and movement metrics
//! from pose-estimation keypoint tracks.
//!
//! Everything downstream of ingestion works on the immutable frame tables
//! defined here: a [`TrajectoryTable`] as read from disk, the
//! [`CleanedTable`] restricted to geometry, and the [`DeltaTable`] of
//! frame-to-frame differences.

pub mod error;
pub mod table;
pub mod types;

pub use error::{Error, Result};
pub use table::*;
pub use types::*;
