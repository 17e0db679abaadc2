use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitError {
    /// The input could not be loaded as a PDF at all.
    #[error("Failed to open PDF {}: {source}", .path.display())]
    DocumentOpen {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("Failed to read outline: {0}")]
    Outline(#[source] lopdf::Error),

    #[error("Page range {start}-{end} is out of range (1-{total})")]
    Extract { start: u32, end: u32, total: u32 },

    /// Target exists and overwriting was not requested.
    #[error("Output already exists: {}", .path.display())]
    WriteConflict { path: PathBuf },

    #[error("Failed to save PDF {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SplitError>;
