//! Export and share of the annotated canvas.
//!
//! This module provides:
//! - PNG encoding of the current pixel buffer
//! - Downloads into a configurable directory without overwriting earlier files
//! - Clipboard sharing with automatic fallback to a download

pub mod clipboard;
pub mod dependencies;
pub mod file;
pub mod service;
pub mod types;


pub use clipboard::ServeMode;
pub use dependencies::{ExportDependencies, ImageClipboard, ImageDownloader, WaylandClipboard};
pub use file::DownloadConfig;
pub use service::ExportService;
pub use types::{ExportError, ShareOutcome};
