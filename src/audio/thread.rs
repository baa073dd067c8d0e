use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::AudioSettings;

use super::sink::create_sink_at;
use super::types::{AudioCmd, AudioEvent, LoadId};

/// Elapsed playback time of the loaded source.
///
/// `rodio` does not report positions for a rebuilt sink, so the thread keeps
/// its own: the offset the sink started at plus wall time while running.
#[derive(Debug, Default)]
pub(super) struct Clock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Clock {
    pub(super) fn resume(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub(super) fn pause(&mut self) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
    }

    /// Jump to `position`, keeping the running/paused state.
    pub(super) fn reset_to(&mut self, position: Duration) {
        self.accumulated = position;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    pub(super) fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    pub(super) fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}

struct Loaded {
    path: PathBuf,
    load: LoadId,
    /// `Err` keeps the reason the file could not be opened for later play requests.
    sink: Result<Sink, String>,
    duration: Option<Duration>,
}

struct AudioThread {
    stream: Result<OutputStream, String>,
    events: Sender<AudioEvent>,
    loaded: Option<Loaded>,
    clock: Clock,
}

impl AudioThread {
    fn emit(&self, event: AudioEvent) {
        // The receiver only goes away on shutdown.
        let _ = self.events.send(event);
    }

    fn stop_current(&mut self) {
        if let Some(Loaded { sink: Ok(s), .. }) = self.loaded.as_ref() {
            s.stop();
        }
    }

    fn load(&mut self, path: PathBuf, load: LoadId) {
        self.stop_current();
        self.clock = Clock::default();

        let (sink, duration) = match &self.stream {
            Ok(stream) => match create_sink_at(stream, &path, Duration::ZERO) {
                Ok((sink, duration)) => (Ok(sink), duration),
                Err(e) => {
                    log::warn!("{e}");
                    (Err(e.to_string()), None)
                }
            },
            Err(reason) => (Err(reason.clone()), None),
        };

        log::debug!("loaded {} as {load}", path.display());
        if let Some(duration) = duration {
            self.emit(AudioEvent::MetadataReady { load, duration });
        }

        self.loaded = Some(Loaded {
            path,
            load,
            sink,
            duration,
        });
    }

    fn play(&mut self) {
        let Some(loaded) = self.loaded.as_ref() else {
            return;
        };
        let load = loaded.load;
        match &loaded.sink {
            Ok(s) => {
                s.play();
                self.clock.resume();
                self.emit(AudioEvent::Started { load });
            }
            Err(reason) => {
                let reason = reason.clone();
                self.emit(AudioEvent::PlayFailed { load, reason });
            }
        }
    }

    fn pause(&mut self) {
        if let Some(Loaded { sink: Ok(s), .. }) = self.loaded.as_ref() {
            s.pause();
        }
        self.clock.pause();
    }

    /// Scrubbing: rebuild the current sink and skip into the file.
    /// This uses `Source::skip_duration` (works for common formats).
    fn seek_to(&mut self, position: Duration) {
        let Ok(stream) = self.stream.as_ref() else {
            return;
        };
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        let Ok(old) = loaded.sink.as_ref() else {
            return;
        };

        let position = loaded.duration.map_or(position, |d| position.min(d));
        match create_sink_at(stream, &loaded.path, position) {
            Ok((new_sink, _)) => {
                old.stop();
                if self.clock.is_running() {
                    new_sink.play();
                }
                loaded.sink = Ok(new_sink);
                self.clock.reset_to(position);
                let load = loaded.load;
                self.emit(AudioEvent::PositionChanged { load, position });
            }
            Err(e) => log::warn!("seek failed: {e}"),
        }
    }

    /// Periodic position report and end-of-source detection.
    fn tick(&mut self) {
        let Some(Loaded {
            load,
            sink: Ok(s),
            duration,
            ..
        }) = self.loaded.as_ref()
        else {
            return;
        };
        if !self.clock.is_running() {
            return;
        }

        let load = *load;
        if s.empty() {
            self.clock.pause();
            self.emit(AudioEvent::Ended { load });
            return;
        }

        let elapsed = self.clock.elapsed();
        let position = duration.map_or(elapsed, |d| elapsed.min(d));
        self.emit(AudioEvent::PositionChanged { load, position });
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(Loaded { sink: Ok(s), .. }) = self.loaded.as_ref() {
            // Fade out gently before stopping.
            if self.clock.is_running() {
                fade_out_sink(s, fade_out_ms);
            }
            s.stop();
        }
        self.clock.pause();
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    sink.set_volume(1.0);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

fn open_output() -> Result<OutputStream, String> {
    match OutputStreamBuilder::open_default_stream() {
        Ok(mut stream) => {
            // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
            // but noisy for a TUI app.
            stream.log_on_drop(false);
            Ok(stream)
        }
        Err(e) => {
            log::error!("no audio output device: {e}");
            Err(format!("no audio output device: {e}"))
        }
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<AudioEvent>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut audio = AudioThread {
            stream: open_output(),
            events,
            loaded: None,
            clock: Clock::default(),
        };
        let tick = Duration::from_millis(audio_settings.tick_ms.max(1));

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { path, load } => audio.load(path, load),
                    AudioCmd::Play => audio.play(),
                    AudioCmd::Pause => audio.pause(),
                    AudioCmd::SeekTo(position) => audio.seek_to(position),
                    AudioCmd::Quit { fade_out_ms } => {
                        audio.quit(fade_out_ms);
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => audio.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        log::debug!("audio thread stopped");
    })
}
