/// Error types for the tagger
///
/// Only real I/O can fail here: the SQLite store, export files, thumbnails
/// and the config file. Everything in the tagging pipeline itself is total.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaggerError {
    /// The annotation database could not be opened, read or written
    #[error("annotation store error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A thumbnail source could not be decoded or the thumbnail not written
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A config or manifest file exists but could not be used
    #[error("invalid file {}: {}", .path.display(), .message)]
    Config { path: PathBuf, message: String },

    #[error("could not determine a user data directory")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, TaggerError>;
