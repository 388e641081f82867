//! Data types for exporting the canvas.

use crate::draw::SurfaceError;
use std::path::PathBuf;
use thiserror::Error;

/// How a share request was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The PNG is on the clipboard.
    Copied,
    /// The clipboard was unavailable; the PNG was downloaded to `path` instead.
    Fallback { path: PathBuf },
}

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to encode canvas: {0}")]
    Encode(#[from] SurfaceError),

    #[error("Failed to save image: {0}")]
    SaveError(#[from] std::io::Error),

    #[error("Clipboard operation failed: {0}")]
    ClipboardError(String),

    #[error("Export task failed: {0}")]
    Task(String),
}
