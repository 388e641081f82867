//! Controller state, uploads and image selection.

use crate::config::Config;
use crate::draw::{CanvasSurface, SurfaceError};
use crate::export::{DownloadConfig, ExportDependencies, ExportService};
use crate::input::{StrokeEngine, StrokeSession, ToolMode, ToolSelector, ToolStyles};
use crate::notification::{LogObserver, Notice, UiObserver};
use crate::store::{
    CompletionOutcome, DefaultFileSource, FileReader, FileSource, ImageFile, ImageId, ImageRecord,
    ImageStore, ReadCompletion, RemoveOutcome,
};
use std::sync::Arc;

/// Host-provided collaborators. Defaults read real files, use the system
/// clipboard and downloads directory, and log notices.
#[derive(Clone)]
pub struct Collaborators {
    pub files: Arc<dyn FileSource>,
    pub export: ExportDependencies,
    pub observer: Arc<dyn UiObserver>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            files: Arc::new(DefaultFileSource),
            export: ExportDependencies::default(),
            observer: Arc::new(LogObserver),
        }
    }
}

/// Single owner of all annotation state.
///
/// All methods are meant to be called from one event-handling thread. File
/// reads and export jobs run in the background and never hold a borrow of the
/// annotator while suspended.
pub struct Annotator {
    pub(super) store: ImageStore,
    pub(super) reader: FileReader,
    pub(super) surface: CanvasSurface,
    pub(super) tools: ToolSelector,
    pub(super) strokes: StrokeEngine,
    pub(super) export: ExportService,
    pub(super) observer: Arc<dyn UiObserver>,
}

impl Annotator {
    /// Creates an annotator with default collaborators.
    pub fn new(config: &Config) -> Result<Self, SurfaceError> {
        Self::with_collaborators(config, Collaborators::default())
    }

    pub fn with_collaborators(
        config: &Config,
        collaborators: Collaborators,
    ) -> Result<Self, SurfaceError> {
        let surface = CanvasSurface::new(
            config.canvas.width,
            config.canvas.height,
            config.canvas.margin,
        )?;
        let export = ExportService::with_dependencies(
            DownloadConfig::from(&config.export),
            collaborators.export,
        );

        log::debug!(
            "Annotator ready: {}x{} canvas, downloads to {}",
            surface.width(),
            surface.height(),
            export.config().directory.display()
        );

        let annotator = Self {
            store: ImageStore::new(),
            reader: FileReader::new(collaborators.files),
            surface,
            tools: ToolSelector::new(),
            strokes: StrokeEngine::new(ToolStyles::from_config(&config.drawing)),
            export,
            observer: collaborators.observer,
        };
        annotator.observer.tool_changed(annotator.tools.current());
        Ok(annotator)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    pub fn surface(&self) -> &CanvasSurface {
        &self.surface
    }

    pub fn tool(&self) -> ToolMode {
        self.tools.current()
    }

    pub fn stroke_session(&self) -> StrokeSession {
        self.strokes.session()
    }

    pub fn active_image(&self) -> Option<&ImageRecord> {
        self.store.active()
    }

    /// Number of file reads still running.
    pub fn pending_reads(&self) -> usize {
        self.reader.in_flight()
    }

    // ------------------------------------------------------------------
    // Uploads
    // ------------------------------------------------------------------

    /// Starts reading `file` into the current batch.
    ///
    /// Reads run on the current tokio runtime. Returns `false` (and does
    /// nothing else) when the file is not an image or no runtime is running.
    pub fn add(&mut self, file: ImageFile) -> bool {
        if !file.is_image() {
            log::debug!(
                "Ignoring '{}': media type {:?} is not an image",
                file.name(),
                file.media_type()
            );
            return false;
        }
        if tokio::runtime::Handle::try_current().is_err() {
            log::error!("Cannot read '{}': no tokio runtime is running", file.name());
            return false;
        }
        log::debug!("Reading '{}'", file.name());
        self.reader.spawn(self.store.generation(), file);
        true
    }

    /// Adds every file of `files` to the current batch. Returns how many were accepted.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = ImageFile>) -> usize {
        let mut accepted = 0;
        for file in files {
            if self.add(file) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Discards all uploads and the selection, then adds `files` as a new batch.
    ///
    /// Must be called inside a tokio runtime, as for [`add`](Self::add).
    /// Reads still running for the previous batch are dropped when they finish.
    pub fn replace_all(&mut self, files: impl IntoIterator<Item = ImageFile>) -> usize {
        let had_active = self.store.active_id().is_some();
        let batch = self.store.begin_batch();
        if had_active {
            self.observer.active_image_changed(None);
        }
        let accepted = self.add_files(files);
        log::info!("Upload batch {}: {} image file(s) accepted", batch, accepted);
        accepted
    }

    /// Applies a finished read, painting the image if it became active.
    ///
    /// An image that decodes but cannot be painted is dropped and reported as
    /// [`CompletionOutcome::Failed`]; the next image of the batch may become active.
    pub fn apply_completion(
        &mut self,
        completion: ReadCompletion,
    ) -> Result<CompletionOutcome, SurfaceError> {
        let outcome = self.store.complete(completion);
        if let CompletionOutcome::Added {
            id,
            activated: true,
        } = outcome
        {
            if let Err(e) = self.paint_record(id) {
                log::warn!("Dropping image {}: cannot paint it ({})", id, e);
                self.store.discard(id);
                self.surface.clear()?;
                return Ok(CompletionOutcome::Failed);
            }
            self.observer.active_image_changed(Some(id));
        }
        Ok(outcome)
    }

    /// Applies every read that has already finished, without waiting.
    pub fn pump_reads(&mut self) -> Result<usize, SurfaceError> {
        let mut applied = 0;
        while let Some(completion) = self.reader.try_next() {
            self.apply_completion(completion)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Waits for the next read to finish and applies it.
    ///
    /// Returns `Ok(None)` when no read is running.
    pub async fn next_read(&mut self) -> Result<Option<CompletionOutcome>, SurfaceError> {
        match self.reader.next().await {
            Some(completion) => self.apply_completion(completion).map(Some),
            None => Ok(None),
        }
    }

    /// Waits until every running read has finished and been applied.
    pub async fn settle_reads(&mut self) -> Result<(), SurfaceError> {
        while self.next_read().await?.is_some() {}
        Ok(())
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Makes `id` active. Unknown ids are ignored.
    ///
    /// Selection does not repaint; see [`reload_active`](Self::reload_active).
    pub fn select(&mut self, id: ImageId) -> Option<&ImageRecord> {
        if self.store.select(id).is_none() {
            log::debug!("Select ignored: no image {}", id);
            return None;
        }
        self.observer.active_image_changed(Some(id));
        self.store.get(id)
    }

    /// Deletes `id`. Removing the active image also clears the canvas.
    pub fn remove(&mut self, id: ImageId) -> Result<RemoveOutcome, SurfaceError> {
        let outcome = self.store.remove(id);
        if let RemoveOutcome::Removed { was_active: true } = outcome {
            self.surface.clear()?;
            self.observer.active_image_changed(None);
        }
        Ok(outcome)
    }

    /// Repaints the active image, wiping all strokes.
    ///
    /// Without an active image the user is told to select one and `false` is returned.
    pub fn reload_active(&mut self) -> Result<bool, SurfaceError> {
        let Some(id) = self.store.active_id() else {
            self.observer.notify(&Notice::NoActiveImage);
            return Ok(false);
        };
        self.paint_record(id)?;
        Ok(true)
    }

    /// Clears every pixel (image and strokes).
    pub fn clear_canvas(&mut self) -> Result<(), SurfaceError> {
        self.surface.clear()
    }

    fn paint_record(&mut self, id: ImageId) -> Result<(), SurfaceError> {
        if let Some(record) = self.store.get(id) {
            let pixels = Arc::clone(record.pixels());
            self.surface.paint_image(&pixels)?;
        }
        Ok(())
    }
}
