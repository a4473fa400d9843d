/// Error types for data reductions over solver output
use gst_claw::error::ClawError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// Frame or gauge reading failed
    #[error(transparent)]
    Claw(#[from] ClawError),

    /// Transect start and end coincide
    #[error("degenerate transect: start and end are both {0:?}")]
    DegenerateLine((f64, f64)),

    /// Fewer than two transect samples requested
    #[error("transect needs at least 2 samples, got {0}")]
    InvalidSampleCount(usize),

    /// A mass log record could not be parsed
    #[error("malformed mass log line {lineno}: {reason}")]
    MalformedLogLine { lineno: usize, reason: String },

    /// Reference mass is zero or not finite
    #[error("reference mass must be finite and non-zero, got {0}")]
    InvalidReferenceMass(f64),

    /// Observation file could not be parsed
    #[error("malformed observation file {path:?}: {reason}")]
    MalformedObservations { path: PathBuf, reason: String },

    /// Reading or writing a file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a CSV export
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl DataError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Type alias for Results using DataError
pub type Result<T> = std::result::Result<T, DataError>;
