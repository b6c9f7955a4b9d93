//! Error types for the presenter
//!
//! None of these reach the staging core's callers: decode failures turn into
//! the null raster and settings failures fall back to defaults. They exist so
//! the helpers underneath can use `?`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresenterError {
    /// Filesystem access failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// An image file could not be decoded
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Settings file could not be parsed or written
    #[error("settings error: {source}")]
    Settings {
        #[from]
        source: serde_json::Error,
    },

    /// Directory traversal failed
    #[error("folder scan error: {source}")]
    Walk {
        #[from]
        source: walkdir::Error,
    },

    /// No per-user configuration directory on this platform
    #[error("could not determine configuration directory")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, PresenterError>;
