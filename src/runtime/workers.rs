//! Background work that must not block the event loop.
//!
//! Each job runs on its own thread and reports back with one [`WorkEvent`].

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::app::GenerationToken;
use crate::config::LibrarySettings;
use crate::generate::{GenerateError, PlaylistGenerator};
use crate::library::{TrackDescriptor, collect_audio_files, read_batch};

#[derive(Debug)]
pub enum WorkEvent {
    /// Metadata for one add-files request, in input order.
    UploadReady(Vec<TrackDescriptor>),
    PlaylistGenerated {
        token: GenerationToken,
        result: Result<Vec<TrackDescriptor>, GenerateError>,
    },
}

#[derive(Clone)]
pub struct Workers {
    tx: Sender<WorkEvent>,
    generator: Arc<dyn PlaylistGenerator>,
    library: LibrarySettings,
}

impl Workers {
    pub fn new(
        tx: Sender<WorkEvent>,
        generator: Arc<dyn PlaylistGenerator>,
        library: LibrarySettings,
    ) -> Self {
        Self {
            tx,
            generator,
            library,
        }
    }

    /// Expand `paths` into audio files and read their metadata.
    pub fn upload(&self, paths: Vec<PathBuf>) {
        let tx = self.tx.clone();
        let library = self.library.clone();
        thread::spawn(move || {
            let files = collect_audio_files(&paths, &library);
            log::debug!("reading metadata for {} files", files.len());
            let batch = read_batch(&files);
            let _ = tx.send(WorkEvent::UploadReady(batch));
        });
    }

    pub fn generate(&self, token: GenerationToken, prompt: String) {
        let tx = self.tx.clone();
        let generator = Arc::clone(&self.generator);
        thread::spawn(move || {
            log::info!("generating playlist for {prompt:?}");
            let result = generator.generate(&prompt);
            let _ = tx.send(WorkEvent::PlaylistGenerated { token, result });
        });
    }
}
