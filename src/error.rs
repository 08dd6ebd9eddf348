use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide error type. Every failure names the entry or file it
/// concerns and, where a check failed, what was expected versus found.
#[derive(Debug, Error)]
pub enum UncookError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Structural violation: bad magic, bad flag code, bad fixed marker,
    /// inconsistent directory placement.
    #[error("format: {0}")]
    Format(String),

    /// Decompressed or constructed data failed a declared size or range
    /// check.
    #[error("integrity: {0}")]
    Integrity(String),

    /// Extraction never overwrites; an existing destination is fatal for
    /// that entry.
    #[error("refusing to overwrite existing file: {}", .0.display())]
    Conflict(PathBuf),

    #[error("no PALETTE.PAL found for {} in its own or any sibling directory", .0.display())]
    PaletteNotFound(PathBuf),

    /// Missing external tool or unusable invocation, reported before any
    /// data is touched.
    #[error("configuration: {0}")]
    Configuration(String),

    #[error("image encode: {0}")]
    Image(#[from] image::ImageError),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type UncookResult<T> = Result<T, UncookError>;
