//! Uploaded images and the active selection.
//!
//! The store keeps records in upload order and tracks which one is active.
//! Uploads arrive in batches: starting a new batch discards every record of
//! the previous one and bumps the batch generation, so reads that were still
//! running for the old batch are dropped when they complete.

pub mod reader;
pub mod record;
pub mod source;

pub use reader::{FileReader, ReadCompletion};
pub use record::{FileData, ImageFile, ImageId, ImageRecord};
pub use source::{DefaultFileSource, FileSource, LoadError};

/// What happened to a finished read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// A record was appended. `activated` is set for the first record of the batch.
    Added { id: ImageId, activated: bool },
    /// The read belonged to a superseded batch and was discarded.
    Stale,
    /// The file could not be read or decoded and was skipped.
    Failed,
}

/// Result of [`ImageStore::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    NotFound,
    Removed { was_active: bool },
}

/// Ordered collection of uploads plus the active selection.
#[derive(Debug, Default)]
pub struct ImageStore {
    collection: Vec<ImageRecord>,
    active: Option<ImageId>,
    generation: u64,
    batch_has_active: bool,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current batch generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Discards every record and the selection and starts a new batch.
    ///
    /// Returns the generation reads of the new batch must carry.
    pub fn begin_batch(&mut self) -> u64 {
        self.collection.clear();
        self.active = None;
        self.generation += 1;
        self.batch_has_active = false;
        log::debug!("Started upload batch {}", self.generation);
        self.generation
    }

    /// Applies a finished read.
    pub fn complete(&mut self, completion: ReadCompletion) -> CompletionOutcome {
        if completion.batch != self.generation {
            log::debug!(
                "Discarding stale read of '{}' (batch {}, current {})",
                completion.name,
                completion.batch,
                self.generation
            );
            return CompletionOutcome::Stale;
        }

        match completion.result {
            Ok(pixels) => {
                let record = ImageRecord::new(completion.name, pixels);
                let id = record.id();
                let (width, height) = record.dimensions();
                log::info!(
                    "Added image '{}' as {} ({}x{})",
                    record.name(),
                    id,
                    width,
                    height
                );
                self.collection.push(record);

                let activated = !self.batch_has_active;
                if activated {
                    self.batch_has_active = true;
                    self.active = Some(id);
                }
                CompletionOutcome::Added { id, activated }
            }
            Err(err) => {
                log::warn!("Skipping '{}': {}", completion.name, err);
                CompletionOutcome::Failed
            }
        }
    }

    /// Removes the record with `id`, clearing the selection if it was active.
    pub fn remove(&mut self, id: ImageId) -> RemoveOutcome {
        let Some(index) = self.collection.iter().position(|r| r.id() == id) else {
            log::debug!("Remove ignored: no image {}", id);
            return RemoveOutcome::NotFound;
        };

        let record = self.collection.remove(index);
        let was_active = self.active == Some(id);
        if was_active {
            self.active = None;
        }
        log::info!("Removed image '{}' ({})", record.name(), id);
        RemoveOutcome::Removed { was_active }
    }

    /// Drops a record that could not be shown.
    ///
    /// If it held the batch's active slot, the slot is released so the next
    /// completion of the batch claims it.
    pub fn discard(&mut self, id: ImageId) -> bool {
        let Some(index) = self.collection.iter().position(|r| r.id() == id) else {
            return false;
        };
        self.collection.remove(index);
        if self.active == Some(id) {
            self.active = None;
            self.batch_has_active = false;
        }
        true
    }

    /// Makes `id` the active record. Unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: ImageId) -> Option<&ImageRecord> {
        let record = self.collection.iter().find(|r| r.id() == id)?;
        self.active = Some(id);
        Some(record)
    }

    pub fn active(&self) -> Option<&ImageRecord> {
        let id = self.active?;
        self.get(id)
    }

    pub fn active_id(&self) -> Option<ImageId> {
        self.active
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageRecord> {
        self.collection.iter().find(|r| r.id() == id)
    }

    /// Records in upload order.
    pub fn records(&self) -> &[ImageRecord] {
        &self.collection
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }
}
