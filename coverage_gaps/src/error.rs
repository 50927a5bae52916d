use std::{fmt, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GapError {
    #[error("coverage report decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("cannot make {path:?} relative to {root:?}: {reason}")]
    Relativize {
        root: PathBuf,
        path: PathBuf,
        reason: String,
    },
    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, GapError>;

impl GapError {
    pub fn relativize(
        root: impl Into<PathBuf>,
        path: impl Into<PathBuf>,
        reason: impl fmt::Display,
    ) -> Self {
        Self::Relativize {
            root: root.into(),
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
