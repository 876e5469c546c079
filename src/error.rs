//! Error types for the transcription pipeline, defined with thiserror.

use std::path::PathBuf;

use thiserror::Error;

use crate::runtime::RuntimeError;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// A slice was requested with a non-positive duration.
    #[error("invalid time range: end {end_ms}ms must be greater than start {start_ms}ms")]
    InvalidRange { start_ms: f64, end_ms: f64 },

    /// The audio file could not be read or decoded.
    #[error("audio file error: {0}")]
    Wav(#[from] hound::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A save destination that is blank or not an existing directory.
    /// Reported to the user as a warning, never a crash.
    #[error("save destination is not an existing directory: {0}")]
    InvalidSaveDir(PathBuf),

    /// Failure surfaced by the inference backend. Not locally recovered;
    /// the current job aborts.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
