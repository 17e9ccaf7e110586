/// Error types surfaced to the user through the status line
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SketchError {
    /// Custom interval outside 1..=3600 seconds
    #[error("Interval must be between 1 and 3600 seconds (got {value})")]
    InvalidInterval { value: String },

    #[error("Invalid input '{input}': please enter a number of seconds")]
    NotANumber { input: String },

    /// Folder has no matching images, or start was requested without images
    #[error("No images loaded: select a folder containing PNG or JPEG files first")]
    EmptySelection,

    #[error("Failed to read folder {path:?}: {source}")]
    FolderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path:?}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
