use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use url::Url;

use crate::catalog::Fetch;
use crate::player::Media;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioError, PlaybackHandle, PlaybackInfo};

/// Handle to the single media resource.
///
/// Commands go to the audio thread; reads come from the shared
/// [`PlaybackInfo`] it publishes.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Open the default output device and start the audio thread.
    pub fn new(fetcher: Arc<dyn Fetch>, initial_volume: f32) -> Result<Self, AudioError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle = spawn_audio_thread(
            fetcher,
            tx.clone(),
            rx,
            playback_info.clone(),
            initial_volume,
            ready_tx,
        );

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(msg)) => {
                let _ = audio_handle.join();
                return Err(AudioError::NoOutputDevice(msg));
            }
            Err(_) => return Err(AudioError::ThreadGone),
        }

        Ok(Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        })
    }

    /// A player with no audio thread behind it; commands land on the returned receiver.
    #[cfg(test)]
    pub(crate) fn detached() -> (Self, mpsc::Receiver<AudioCmd>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let player = Self {
            tx,
            playback: Arc::new(Mutex::new(PlaybackInfo::default())),
            join: Mutex::new(None),
        };
        (player, rx)
    }

    #[cfg(test)]
    pub(crate) fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
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

    fn info(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    fn update(&self, f: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.playback.lock() {
            f(&mut info);
        }
    }

    fn command(&self, cmd: AudioCmd) {
        if let Err(e) = self.send(cmd) {
            tracing::error!(cmd = ?e.0, "audio thread is gone");
        }
    }
}

impl Media for AudioPlayer {
    fn set_source(&mut self, url: Url) {
        // Readers see the reset right away, not once the thread gets to it.
        self.update(|info| info.reset_for(url.clone()));
        self.command(AudioCmd::Load { url });
    }

    fn source(&self) -> Option<Url> {
        self.info().source
    }

    fn play(&mut self) {
        self.update(|info| {
            if info.source.is_some() {
                info.playing = true;
                info.ended = false;
            }
        });
        self.command(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.update(|info| info.playing = false);
        self.command(AudioCmd::Pause);
    }

    fn is_paused(&self) -> bool {
        !self.info().playing
    }

    fn current_time(&self) -> Duration {
        self.info().elapsed
    }

    fn duration(&self) -> Option<Duration> {
        self.info().duration
    }

    fn set_current_time(&mut self, at: Duration) {
        self.update(|info| info.elapsed = at);
        self.command(AudioCmd::Seek(at));
    }

    fn set_volume(&mut self, gain: f32) {
        self.command(AudioCmd::SetVolume(gain.clamp(0.0, 1.0)));
    }

    fn take_ended(&mut self) -> bool {
        self.playback
            .lock()
            .map(|mut info| std::mem::take(&mut info.ended))
            .unwrap_or(false)
    }

    fn error(&self) -> Option<String> {
        self.info().error
    }
}
