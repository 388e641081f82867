//! Uploaded image records and the files they are read from.

use image::{ImageFormat, RgbaImage};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Session-unique identifier of an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "img_{}", self.0.simple())
    }
}

/// A decoded upload. Immutable once created; the pixels are shared so the
/// canvas can repaint from them without copying.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    id: ImageId,
    name: String,
    pixels: Arc<RgbaImage>,
}

impl ImageRecord {
    pub(crate) fn new(name: String, pixels: Arc<RgbaImage>) -> Self {
        Self {
            id: ImageId::new(),
            name,
            pixels,
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pixels(&self) -> &Arc<RgbaImage> {
        &self.pixels
    }

    /// Natural (unscaled) size in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// Where the bytes of an uploaded file live.
#[derive(Debug, Clone)]
pub enum FileData {
    /// On disk; read when the upload is processed
    Path(PathBuf),
    /// Already in memory (e.g. handed over by a drop target)
    Bytes(Arc<[u8]>),
}

/// A file offered for upload, before its type has been checked.
#[derive(Debug, Clone)]
pub struct ImageFile {
    name: String,
    media_type: Option<String>,
    data: FileData,
}

impl ImageFile {
    /// A file on disk. Its media type is inferred from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            media_type: None,
            data: FileData::Path(path.to_path_buf()),
        }
    }

    /// An in-memory file.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            media_type: None,
            data: FileData::Bytes(bytes.into()),
        }
    }

    /// Overrides the media type reported by the host.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &FileData {
        &self.data
    }

    /// The declared media type, or one inferred from the file name.
    pub fn media_type(&self) -> Option<String> {
        if let Some(declared) = self.media_type.as_ref().filter(|m| !m.is_empty()) {
            return Some(declared.to_lowercase());
        }
        ImageFormat::from_path(&self.name)
            .ok()
            .map(|format| format.to_mime_type().to_string())
    }

    /// Whether the file passes the `image/*` filter.
    pub fn is_image(&self) -> bool {
        self.media_type()
            .is_some_and(|media_type| media_type.starts_with("image/"))
    }
}
