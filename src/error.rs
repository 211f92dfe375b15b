use std::path::PathBuf;

use crate::{fragment::FragmentError, path_guard::PathError};

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("malformed fragment #{index}: {source}")]
    MalformedFragment {
        index: usize,
        #[source]
        source: FragmentError,
    },

    #[error("assembly error: {0}")]
    Assembly(String),

    #[error("path error: {0}")]
    Path(#[from] PathError),

    #[error("persistence error: failed to write '{}': {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serde(String),
}

impl ExportError {
    pub fn malformed(index: usize, source: FragmentError) -> Self {
        Self::MalformedFragment { index, source }
    }

    pub fn assembly(msg: impl Into<String>) -> Self {
        Self::Assembly(msg.into())
    }

    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
