use std::path::PathBuf;

use thiserror::Error;

/// Failures the lookup engine cannot recover from in-process.
///
/// Everything else (skipped rows, empty queries, unsearchable schemas,
/// unparseable dates) is an ordinary return value.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Malformed dataset {path:?}: {reason}")]
    MalformedDataset { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl LookupError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LookupError::MalformedDataset {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
