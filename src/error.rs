use std::path::PathBuf;
use thiserror::Error;

/// Problems detected before any file is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No input files specified")]
    NoInputs,

    #[error("Empty page selection")]
    EmptyExpression,

    #[error("Invalid page selection: {0:?} (expected e.g. \"1,2,5-10,20\")")]
    Malformed(String),

    #[error("Invalid page range: {0:?}")]
    MalformedClause(String),

    #[error("Page numbers must be >= 1")]
    PageZero,

    #[error("Page {page} is out of range (1-{page_count}) in {}", .path.display())]
    PageOutOfRange {
        page: u32,
        page_count: u32,
        path: PathBuf,
    },

    #[error(
        "{} and {} would both write to {}",
        .first.display(),
        .second.display(),
        .dir.display()
    )]
    OutputCollision {
        first: PathBuf,
        second: PathBuf,
        dir: PathBuf,
    },
}

#[derive(Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to open PDF: {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("Failed to create directory: {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save PDF: {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Malformed PDF structure in {}: {message}", .path.display())]
    Pdf { path: PathBuf, message: String },
}

impl JobError {
    /// True for errors raised before the job touched the filesystem.
    pub fn is_validation(&self) -> bool {
        matches!(self, JobError::Validation(_))
    }
}
