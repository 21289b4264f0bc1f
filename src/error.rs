//! Error type for the fallible edges of the crate (fetching, parsing, loading, exporting).
//!
//! Drawing itself never fails: malformed domains fall back locally, unknown region
//! codes are colored as "no data" and short series simply draw no path.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VizError {
    /// Transport-level failure while fetching a document.
    #[error("network error: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("request failed with HTTP {0}")]
    Status(u16),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a topology or feature collection we understand.
    #[error("unsupported geometry document: {0}")]
    UnsupportedGeometry(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A drawing backend refused an operation.
    #[error("export failed: {0}")]
    Export(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// The fetch was abandoned because its chart was unmounted.
    #[error("fetch cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for VizError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => VizError::Status(status.as_u16()),
            None => VizError::Http(e.to_string()),
        }
    }
}

pub type Result<T, E = VizError> = std::result::Result<T, E>;
