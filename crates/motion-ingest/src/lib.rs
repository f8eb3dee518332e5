//! # Motion-Ingest
//!
//! Reads the per-frame keypoint coordinates exported by a pose-estimation
//! tool and prepares them for metric computation.
//!
//! ## Stages
//!
//! 1. **Header normalization**: accept either the tool's native three header
//!    rows or the two-row layout with the scorer line already stripped
//! 2. **Ingestion**: flatten the header into `<keypoint>_<field>` columns and
//!    index rows by frame number
//! 3. **Cleaning**: drop likelihood columns and keep the analysis window

pub mod cleaner;
pub mod header;
pub mod ingestor;

pub use cleaner::*;
pub use header::*;
pub use ingestor::*;
