use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("operands could not be broadcast together with shapes {lhs:?} {rhs:?}")]
    ShapeMismatch { lhs: Vec<usize>, rhs: Vec<usize> },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Task duration must be finite and non-negative, got {0} seconds")]
    InvalidTaskDuration(f64),
}

impl ConfigError {
    /// True when the config file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConfigError::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
