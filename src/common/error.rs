//! Error types.

use thiserror::Error;

/// Failures of a preference backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("refusing to store non-finite value {value} under {key}")]
    NonFinite { key: String, value: f32 },
}

#[derive(Debug, Error)]
pub enum MusicError {
    #[error("track index {index} out of range (track count {count})")]
    InvalidTrackIndex { index: usize, count: usize },
    #[error("music player has no tracks configured")]
    EmptyTrackList,
    #[error("preference store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}
