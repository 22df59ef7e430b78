//! Error types for playback control.

use rewind_data::DataError;
use thiserror::Error;

/// Errors that can occur while controlling a replay.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("End time must be after start time")]
    InvalidRange,

    #[error("No events loaded")]
    NoEvents,

    #[error(transparent)]
    Data(#[from] DataError),
}
