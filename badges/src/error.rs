//! Per badge failures. None of these stop the batch.

use std::path::PathBuf;
use image::ImageFormat;
use thiserror::Error;


#[derive(Debug, Error)]
pub enum BadgeError {
    /// Source file can't be opened
    #[error("{}: Failed to read source image: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source bytes are not a valid image
    #[error("{}: Failed to decode source image: {}", .path.display(), .source)]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{}: Unsupported source image format {:?}, expected PNG", .path.display(), .format)]
    Unsupported {
        path: PathBuf,
        format: Option<ImageFormat>,
    },

    /// Guard only, the PNG decoder already rejects zero sized images
    #[error("{}: Source image has no pixels", .path.display())]
    Empty {
        path: PathBuf,
    },

    #[error("{}: Failed to create PNG image: {}", .path.display(), .source)]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Destination can't be written
    #[error("{}: Failed to write circular badge: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target would replace the source badge
    #[error("{}: Circular badge target is the source image itself", .path.display())]
    SameAsSource {
        path: PathBuf,
    },

    #[error("Badge task failed to complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}
