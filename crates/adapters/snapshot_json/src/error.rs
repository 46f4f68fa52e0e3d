//! Snapshot-specific error type.

use std::path::PathBuf;

use depot_domain::error::DepotError;

/// Errors originating from reading or writing a JSON snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The document is not valid JSON or does not have the expected shape.
    #[error("malformed snapshot")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the snapshot file failed.
    #[error("cannot access snapshot file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required section is absent or empty.
    #[error("snapshot is missing section {section}")]
    MissingSection { section: String },

    /// The model rejected an object described by the snapshot.
    #[error("snapshot rejected by the model")]
    Domain(#[from] DepotError),
}

impl SnapshotError {
    pub(crate) fn missing(section: impl Into<String>) -> Self {
        Self::MissingSection {
            section: section.into(),
        }
    }
}

impl From<SnapshotError> for DepotError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::Domain(inner) => inner,
            other => Self::Snapshot(Box::new(other)),
        }
    }
}
