//! Reading and decoding uploaded files.

use super::record::{FileData, ImageFile};
use async_trait::async_trait;
use image::RgbaImage;
use std::sync::Arc;
use thiserror::Error;
use tokio::task;

/// Errors that can occur while reading an upload.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Read task failed: {0}")]
    Task(String),
}

/// Abstraction over how the raw bytes of an upload are obtained.
#[async_trait]
pub trait FileSource: Send + Sync {
    async fn read(&self, file: &ImageFile) -> Result<Vec<u8>, LoadError>;
}

/// Reads in-memory uploads directly and on-disk uploads on the blocking pool.
pub struct DefaultFileSource;

#[async_trait]
impl FileSource for DefaultFileSource {
    async fn read(&self, file: &ImageFile) -> Result<Vec<u8>, LoadError> {
        match file.data() {
            FileData::Bytes(bytes) => Ok(bytes.to_vec()),
            FileData::Path(path) => {
                let path = path.clone();
                task::spawn_blocking(move || std::fs::read(path))
                    .await
                    .map_err(|e| LoadError::Task(e.to_string()))?
                    .map_err(LoadError::from)
            }
        }
    }
}

/// Decodes `bytes` into straight-alpha RGBA on the blocking pool.
pub async fn decode(bytes: Vec<u8>) -> Result<Arc<RgbaImage>, LoadError> {
    task::spawn_blocking(move || {
        image::load_from_memory(&bytes)
            .map(|decoded| Arc::new(decoded.to_rgba8()))
            .map_err(LoadError::from)
    })
    .await
    .map_err(|e| LoadError::Task(e.to_string()))?
}
