use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the persistence gateway. Not-found conditions are
/// not errors; store lookups report those through `Option` returns.
#[derive(Debug, Error)]
pub enum MemoError {
    #[error("failed to list memo sets in {}: {}", dir.display(), source)]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {}: {}", path.display(), source)]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {}", path.display(), source)]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize memo records: {0}")]
    Serialize(#[from] serde_json::Error),
}
