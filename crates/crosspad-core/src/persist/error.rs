//! Mixer state persistence errors

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Failed to read mixer state {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write mixer state {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON mixer state: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML mixer state: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type StateResult<T> = Result<T, StateError>;
