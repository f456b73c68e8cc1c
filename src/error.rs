use std::path::PathBuf;

use thiserror::Error;

/// Failures at the file/stdin boundary. The layout engine itself never fails.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid diagram JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid layout config: {0}")]
    Json5(#[from] json5::Error),

    #[error("invalid value for `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
