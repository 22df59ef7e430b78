//! Rewind Data Crate
//!
//! Loading and parsing utilities for trajectory replay: timestamp parsing,
//! the sparse per-object time series, trajectory CSV rows, and the replay
//! configuration document. This crate is host-agnostic and focuses on data
//! parsing and point-in-time queries.

pub mod config;
pub mod error;
pub mod loader;
pub mod timestamp;
pub mod trajectory;

pub use config::{ReplayConfig, load_config};
pub use error::DataError;
pub use loader::{load_trajectory_csv, parse_trajectory_csv};
pub use timestamp::{format_display, format_key, format_stage, parse_timestamp, truncate_to_second};
pub use trajectory::{TrajectoryRow, TrajectoryStore};
