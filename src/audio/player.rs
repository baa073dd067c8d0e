use std::path::Path;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioError, AudioEvent, LoadId, Playback};

pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread. Events it emits arrive on the returned receiver.
    pub fn new(audio_settings: AudioSettings) -> (Self, Receiver<AudioEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<AudioEvent>();

        let audio_handle = spawn_audio_thread(rx, event_tx, audio_settings);

        let player = Self {
            tx,
            join: Mutex::new(Some(audio_handle)),
        };
        (player, event_rx)
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), AudioError> {
        self.tx.send(cmd).map_err(|_| AudioError::Disconnected)
    }

    fn send_or_log(&self, cmd: AudioCmd) {
        if let Err(e) = self.send(cmd) {
            log::warn!("{e}");
        }
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Playback for AudioPlayer {
    fn load(&mut self, path: &Path, load: LoadId) {
        self.send_or_log(AudioCmd::Load {
            path: path.to_path_buf(),
            load,
        });
    }

    fn play(&mut self) -> Result<(), AudioError> {
        self.send(AudioCmd::Play)
    }

    fn pause(&mut self) {
        self.send_or_log(AudioCmd::Pause);
    }

    fn seek_to(&mut self, position: Duration) {
        self.send_or_log(AudioCmd::SeekTo(position));
    }
}
