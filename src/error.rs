//! Error types shared by the classifier, config loader and override store.

use std::path::PathBuf;

use crate::structures::StructureClass;

#[derive(Debug, thiserror::Error)]
pub enum TurretLimitError {
    /// Prefab name matched more than one structure class. The classification
    /// table is inconsistent; this never comes from legitimate input.
    #[error("prefab '{prefab}' matched multiple turret types: {matches:?}")]
    AmbiguousStructure {
        prefab: String,
        matches: Vec<StructureClass>,
    },
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error at {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl TurretLimitError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, TurretLimitError>;
