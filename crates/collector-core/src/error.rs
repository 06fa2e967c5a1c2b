use std::path::PathBuf;
use thiserror::Error;

use crate::classify::Category;

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("the {0} toggle is disabled while only markdown is collected")]
    ToggleDisabled(Category),
}

impl CollectorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectorError>;
