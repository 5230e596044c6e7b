use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a compile run.
///
/// Missing or unreadable research files are not errors; they are reported
/// through [`crate::reader::SourceText`] and simply left out of the bundle.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Invalid strip pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Global name {0:?} is not a JavaScript identifier")]
    GlobalName(String),

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Report serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompileError {
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CompileError::Write {
            path: path.into(),
            source,
        }
    }
}
