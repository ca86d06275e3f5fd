//! Errors raised while loading and running scenarios.

use std::path::PathBuf;

use access_core::AccessError;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid scenario: {0}")]
    Invalid(String),

    /// Rules history could not be replayed
    #[error("rules registry rejected scenario: {0}")]
    Rules(#[from] AccessError),

    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScenarioError>;
