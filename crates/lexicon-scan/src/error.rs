use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot enumerate search root {root}: {source}")]
    InvalidSearchRoot {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern '{id}': {message}")]
    InvalidPattern { id: String, message: String },

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl ScanError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::InvalidSearchRoot { .. } | Self::InvalidPattern { .. } | Self::Config { .. } => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }
}
