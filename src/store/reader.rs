//! Background reads of uploaded files.
//!
//! Each read runs as its own tokio task and reports back over a channel, so the
//! caller keeps handling input while files load. Completions carry the batch
//! generation they were started under; the [`ImageStore`](super::ImageStore)
//! decides whether they are still wanted.

use super::record::ImageFile;
use super::source::{self, FileSource, LoadError};
use image::RgbaImage;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Result of one background read.
#[derive(Debug)]
pub struct ReadCompletion {
    /// Batch generation the read was started under
    pub batch: u64,
    /// File name, for logging and the record name
    pub name: String,
    pub result: Result<Arc<RgbaImage>, LoadError>,
}

/// Spawns file reads and collects their completions in arrival order.
pub struct FileReader {
    source: Arc<dyn FileSource>,
    completion_tx: mpsc::UnboundedSender<ReadCompletion>,
    completion_rx: mpsc::UnboundedReceiver<ReadCompletion>,
    in_flight: usize,
}

impl FileReader {
    pub fn new(source: Arc<dyn FileSource>) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            source,
            completion_tx,
            completion_rx,
            in_flight: 0,
        }
    }

    /// Starts reading `file` on the current tokio runtime.
    pub fn spawn(&mut self, batch: u64, file: ImageFile) {
        let source = Arc::clone(&self.source);
        let tx = self.completion_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let name = file.name().to_string();
            let result = match source.read(&file).await {
                Ok(bytes) => source::decode(bytes).await,
                Err(err) => Err(err),
            };
            if tx.send(ReadCompletion { batch, name, result }).is_err() {
                log::debug!("File reader dropped before read completed");
            }
        });
    }

    /// Number of reads started but not yet handed out.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Returns a finished read without waiting.
    pub fn try_next(&mut self) -> Option<ReadCompletion> {
        let completion = self.completion_rx.try_recv().ok()?;
        self.in_flight -= 1;
        Some(completion)
    }

    /// Waits for the next finished read. Returns `None` when nothing is in flight.
    pub async fn next(&mut self) -> Option<ReadCompletion> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.completion_rx.recv().await?;
        self.in_flight -= 1;
        Some(completion)
    }
}
