use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use url::Url;

use crate::catalog::Fetch;

use super::sink::{create_sink_at, position, probe_duration};
use super::types::{AudioCmd, PlaybackHandle};

/// Everything the audio thread owns besides the output stream.
struct Deck {
    fetcher: Arc<dyn Fetch>,
    loopback: Sender<AudioCmd>,
    playback_info: PlaybackHandle,

    current: Option<Url>,
    data: Option<Arc<[u8]>>,
    sink: Option<Sink>,
    total: Option<Duration>,
    volume: f32,

    /// Playback was requested; stays set while the source is still loading.
    want_play: bool,
    /// Seek requested before the source finished loading.
    pending_seek: Option<Duration>,

    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Deck {
    fn elapsed(&self) -> Duration {
        position(
            self.accumulated,
            self.started_at.map(|st| st.elapsed()),
            self.total,
        )
    }

    fn publish(&self, f: impl FnOnce(&mut super::types::PlaybackInfo)) {
        if let Ok(mut info) = self.playback_info.lock() {
            f(&mut info);
        }
    }

    fn load(&mut self, url: Url) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.data = None;
        self.total = None;
        self.want_play = false;
        self.pending_seek = None;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.current = Some(url.clone());
        self.publish(|info| info.reset_for(url.clone()));

        let fetcher = self.fetcher.clone();
        let loopback = self.loopback.clone();
        thread::spawn(move || {
            let result = fetcher
                .get_bytes(&url)
                .map(Arc::<[u8]>::from)
                .map_err(|e| e.to_string());
            let _ = loopback.send(AudioCmd::Loaded { url, result });
        });
    }

    fn loaded(&mut self, stream: &OutputStream, url: Url, result: Result<Arc<[u8]>, String>) {
        if self.current.as_ref() != Some(&url) {
            tracing::debug!(%url, "dropping audio for a source that is no longer current");
            return;
        }

        let data = match result {
            Ok(d) => d,
            Err(msg) => return self.fail(&url, msg),
        };
        let total = probe_duration(&data);
        let start = self
            .pending_seek
            .take()
            .map(|p| total.map_or(p, |t| p.min(t)))
            .unwrap_or(Duration::ZERO);

        let sink = match create_sink_at(stream, &data, start, self.volume) {
            Ok(s) => s,
            Err(e) => return self.fail(&url, e.to_string()),
        };
        tracing::info!(%url, ?total, bytes = data.len(), "source loaded");

        self.data = Some(data);
        self.total = total;
        self.accumulated = start;
        if self.want_play {
            sink.play();
            self.started_at = Some(Instant::now());
        }
        self.sink = Some(sink);

        let playing = self.want_play;
        self.publish(|info| {
            info.loading = false;
            info.duration = total;
            info.elapsed = start;
            info.playing = playing;
        });
    }

    fn fail(&mut self, url: &Url, msg: String) {
        tracing::warn!(%url, error = %msg, "cannot play source");
        self.want_play = false;
        self.publish(|info| {
            info.loading = false;
            info.playing = false;
            info.error = Some(msg);
        });
    }

    fn play(&mut self, stream: &OutputStream) {
        if self.current.is_none() {
            self.publish(|info| info.playing = false);
            return;
        }
        self.want_play = true;

        // Like a media element: playing again after the end starts over.
        let finished = self.sink.as_ref().is_some_and(Sink::empty);
        if finished {
            self.rebuild_at(stream, Duration::ZERO);
        }

        if let Some(s) = self.sink.as_ref() {
            if self.started_at.is_none() {
                s.play();
                self.started_at = Some(Instant::now());
            }
        }
        let loading = self.sink.is_none();
        self.publish(|info| {
            info.playing = true;
            info.ended = false;
            info.loading = loading && info.error.is_none();
        });
    }

    fn pause(&mut self) {
        self.want_play = false;
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        let elapsed = self.elapsed();
        self.publish(|info| {
            info.playing = false;
            info.elapsed = elapsed;
        });
    }

    /// Scrubbing: rebuild the current sink and skip into the data.
    fn seek(&mut self, stream: &OutputStream, to: Duration) {
        if self.data.is_none() {
            self.pending_seek = Some(to);
            return;
        }
        let to = self.total.map_or(to, |t| to.min(t));
        self.rebuild_at(stream, to);
        if self.want_play {
            if let Some(s) = self.sink.as_ref() {
                s.play();
                self.started_at = Some(Instant::now());
            }
        }
        self.publish(|info| {
            info.elapsed = to;
            info.ended = false;
        });
    }

    fn rebuild_at(&mut self, stream: &OutputStream, at: Duration) {
        let Some(data) = self.data.clone() else {
            return;
        };
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.started_at = None;
        self.accumulated = at;
        match create_sink_at(stream, &data, at, self.volume) {
            Ok(s) => self.sink = Some(s),
            Err(e) => {
                if let Some(url) = self.current.clone() {
                    self.fail(&url, e.to_string());
                }
            }
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.volume);
        }
    }

    /// Periodic bookkeeping: publish the position, detect the end of the source.
    fn tick(&mut self) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        if self.want_play && s.empty() {
            self.want_play = false;
            self.started_at = None;
            self.accumulated = self.total.unwrap_or(self.accumulated);
            let end = self.accumulated;
            tracing::debug!(url = ?self.current.as_ref().map(Url::as_str), "source ended");
            self.publish(|info| {
                info.playing = false;
                info.ended = true;
                info.elapsed = end;
            });
        } else {
            let elapsed = self.elapsed();
            self.publish(|info| info.elapsed = elapsed);
        }
    }

    fn fade_out(&self, fade_out_ms: u64) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if fade_out_ms == 0 || !self.want_play {
            sink.stop();
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            sink.set_volume(self.volume * (1.0 - t));
            thread::sleep(Duration::from_millis(step_ms));
        }
        sink.stop();
    }
}

pub(super) fn spawn_audio_thread(
    fetcher: Arc<dyn Fetch>,
    loopback: Sender<AudioCmd>,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    initial_volume: f32,
    ready: Sender<Result<(), String>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut deck = Deck {
            fetcher,
            loopback,
            playback_info,
            current: None,
            data: None,
            sink: None,
            total: None,
            volume: initial_volume.clamp(0.0, 1.0),
            want_play: false,
            pending_seek: None,
            started_at: None,
            accumulated: Duration::ZERO,
        };

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { url } => deck.load(url),
                    AudioCmd::Loaded { url, result } => deck.loaded(&stream, url, result),
                    AudioCmd::Play => deck.play(&stream),
                    AudioCmd::Pause => deck.pause(),
                    AudioCmd::Seek(to) => deck.seek(&stream, to),
                    AudioCmd::SetVolume(v) => deck.set_volume(v),
                    AudioCmd::Quit { fade_out_ms } => {
                        deck.fade_out(fade_out_ms);
                        // Update shared state so UI/MPRIS don't keep showing Playing.
                        deck.publish(|info| info.playing = false);
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => deck.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!("audio thread stopped");
    })
}
