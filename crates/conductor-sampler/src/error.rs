//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Error type.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The asset does not exist.
    #[error("Asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    /// The file exists but could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    /// The file decoded but is missing stream information.
    #[error("Invalid audio file {}: {reason}", .path.display())]
    InvalidFormat { path: PathBuf, reason: String },

    /// No decodable audio track.
    #[error("No audio track in {}", .0.display())]
    NoTrack(PathBuf),

    /// Decoded to zero frames.
    #[error("Sample has no audio frames: {}", .0.display())]
    EmptyBuffer(PathBuf),

    #[error(transparent)]
    Core(#[from] conductor_core::Error),
}

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;
