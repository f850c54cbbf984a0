use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;
use polars::error::PolarsError;

/// Error type shared by the view engine, the loader and the terminal front end.
#[derive(Debug)]
pub enum ViewError {
    /// A required input (records, field, value) was not supplied.
    MissingArgument(&'static str),
    /// An input had the wrong shape: unknown field, non finite number, unparseable date.
    InvalidArgument(String),
    IoError(Error),
    PolarsError(PolarsError),
    JsonError(serde_json::Error),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::MissingArgument(what) => write!(f, "missing argument: {what}"),
            ViewError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            ViewError::IoError(e) => write!(f, "io error: {e}"),
            ViewError::PolarsError(e) => write!(f, "polars error: {e}"),
            ViewError::JsonError(e) => write!(f, "json error: {e}"),
            ViewError::LoadingFailed(msg) => write!(f, "loading failed: {msg}"),
            ViewError::FileNotFound => write!(f, "file not found"),
            ViewError::PermissionDenied => write!(f, "permission denied"),
            ViewError::UnknownFileType => write!(f, "unknown file type"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewError::IoError(e) => Some(e),
            ViewError::PolarsError(e) => Some(e),
            ViewError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for ViewError {
    fn from(err: Error) -> Self {
        ViewError::IoError(err)
    }
}

impl From<PolarsError> for ViewError {
    fn from(err: PolarsError) -> Self {
        ViewError::PolarsError(err)
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        ViewError::JsonError(err)
    }
}

/// Runtime settings for the terminal viewer.
#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct ViewConfig {
    /// Milliseconds to wait for a terminal event before redrawing.
    pub event_poll_time: u64,
    pub log_file: PathBuf,
    pub log_filter: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            log_file: PathBuf::from("sv.log"),
            log_filter: "info,sv=debug".to_string(),
        }
    }
}
