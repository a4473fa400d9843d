/// Error types for run data and solver output
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for GST solver-facing operations
#[derive(Error, Debug)]
pub enum ClawError {
    /// Reading or writing a file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Requested frame is not present in the output directory
    #[error("frame {frameno} not found in {outdir:?}")]
    FrameNotFound { frameno: usize, outdir: PathBuf },

    /// Frame files exist but could not be parsed
    #[error("malformed frame file {path:?}: {reason}")]
    MalformedFrame { path: PathBuf, reason: String },

    /// Gauge output file missing or unreadable
    #[error("malformed gauge file {path:?}: {reason}")]
    MalformedGauge { path: PathBuf, reason: String },

    /// A required external location could not be resolved
    #[error("missing required context: {0}")]
    MissingContext(#[from] gst_utils::error::ContextError),

    /// Gauge failed validation
    #[error("invalid gauge {id}: {reason}")]
    InvalidGauge { id: u32, reason: String },

    /// Flag region failed validation
    #[error("invalid flag region {name:?}: {reason}")]
    InvalidRegion { name: String, reason: String },

    /// Domain bounds are empty or inverted
    #[error("invalid domain bounds: {0}")]
    InvalidDomain(String),

    /// Cell counts must be positive
    #[error("invalid resolution: {0}")]
    InvalidResolution(String),

    /// Failed to parse an embedded or user-supplied CSV table
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to (de)serialize run data as JSON
    #[error("Failed to (de)serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClawError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ClawError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Type alias for Results using ClawError
pub type Result<T> = std::result::Result<T, ClawError>;
