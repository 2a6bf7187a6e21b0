// src/audio/player.rs
//! Music playback engine using rodio with sample capture for the waveform.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use ringbuf::{traits::*, HeapRb};
use rodio::source::SamplesConverter;
use rodio::{Decoder, OutputStream, Sink, Source};

use super::analyser::Analyser;
use super::sample_capture::SampleCapture;
use crate::config::PlayerConfig;

/// Smallest capture ring buffer (16384 samples ~= 372ms at 44.1kHz).
const MIN_CAPTURE_CAPACITY: usize = 16384;

/// A decoded file wrapped with the capture tap, ready for the sink.
type CapturedTrack = SampleCapture<SamplesConverter<Decoder<BufReader<File>>, f32>>;

/// Commands sent to the audio playback thread.
enum PlayerCommand {
    Play(CapturedTrack),
    Pause,
    Resume,
    Stop,
    Seek(Duration),
}

/// Playback state mirrored from the audio thread for quick UI access.
#[derive(Default)]
struct PlaybackStatus {
    playing: AtomicBool,
    paused: AtomicBool,
    position_ms: AtomicU64,
    /// Zero while unknown.
    duration_ms: AtomicU64,
}

impl PlaybackStatus {
    fn update(&self, sink: &Sink) {
        self.playing.store(true, Ordering::SeqCst);
        self.paused.store(sink.is_paused(), Ordering::SeqCst);
        self.position_ms
            .store(sink.get_pos().as_millis() as u64, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.playing.store(false, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
    }
}

/// Player for a single track that can `play()`, `pause()`, `resume()`,
/// `seek()` or `stop()`, and exposes the captured audio through an [`Analyser`].
pub struct MusicPlayer {
    /// Sender to the audio thread for commands
    cmd_tx: Sender<PlayerCommand>,
    status: Arc<PlaybackStatus>,
    /// Shared circular buffer containing recent mono samples for the waveform
    sample_buffer: Arc<Mutex<HeapRb<f32>>>,
    fft_size: usize,
}

impl MusicPlayer {
    /// Open the default audio output and spawn the playback thread.
    ///
    /// Fails when no audio output is available; nothing can be played or
    /// visualized without one.
    pub fn new(config: &PlayerConfig, fft_size: usize) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<PlayerCommand>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), String>>(1);

        let status = Arc::new(PlaybackStatus::default());
        let sample_buffer = Arc::new(Mutex::new(HeapRb::<f32>::new(
            fft_size.max(MIN_CAPTURE_CAPACITY),
        )));

        let thread_status = status.clone();
        let thread_buffer = sample_buffer.clone();
        let time_update = config.time_update_interval();

        // The audio thread owns the OutputStream, which must stay on one thread.
        thread::Builder::new()
            .name("waveline-audio".into())
            .spawn(move || {
                let (stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => {
                        let _ = ready_tx.send(Ok(()));
                        pair
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };

                let mut sink: Option<Sink> = None;

                loop {
                    match rx.recv_timeout(time_update) {
                        Ok(PlayerCommand::Play(track)) => {
                            if let Some(s) = sink.take() {
                                s.stop();
                            }
                            // Clear the capture when starting a new track
                            if let Ok(mut buf) = thread_buffer.lock() {
                                buf.clear();
                            }
                            match Sink::try_new(&handle) {
                                Ok(new_sink) => {
                                    new_sink.append(track);
                                    new_sink.play();
                                    sink = Some(new_sink);
                                }
                                Err(e) => tracing::error!("failed to create sink: {}", e),
                            }
                        }
                        Ok(PlayerCommand::Pause) => {
                            if let Some(s) = &sink {
                                s.pause();
                            }
                        }
                        Ok(PlayerCommand::Resume) => {
                            if let Some(s) = &sink {
                                s.play();
                            }
                        }
                        Ok(PlayerCommand::Stop) => {
                            if let Some(s) = sink.take() {
                                s.stop();
                            }
                            thread_status.finish();
                            thread_status.position_ms.store(0, Ordering::SeqCst);
                        }
                        Ok(PlayerCommand::Seek(pos)) => {
                            if let Some(s) = &sink {
                                if let Err(e) = s.try_seek(pos) {
                                    tracing::warn!(?pos, "seek failed: {}", e);
                                }
                            }
                        }
                        // Periodic time update
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }

                    if let Some(s) = &sink {
                        if s.empty() {
                            // Published once, so a following Play is not overwritten
                            sink = None;
                            thread_status.finish();
                            tracing::info!("track finished");
                        } else {
                            thread_status.update(s);
                        }
                    }
                }

                if let Some(s) = sink.take() {
                    s.stop();
                }
                // Keep stream alive until thread exits
                drop(stream);
                tracing::debug!("audio thread finished");
            })
            .context("failed to spawn audio thread")?;

        ready_rx
            .recv()
            .map_err(|_| anyhow!("audio thread exited during startup"))?
            .map_err(|e| anyhow!("no audio output available: {e}"))?;

        tracing::info!(fft_size, "audio output opened");

        Ok(Self {
            cmd_tx: tx,
            status,
            sample_buffer,
            fft_size,
        })
    }

    /// Decode `path` and start playing it, replacing any prior playback.
    pub fn play(&mut self, path: &Path) -> Result<()> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let decoder = Decoder::new(BufReader::new(file))
            .with_context(|| format!("failed to decode {}", path.display()))?;

        let duration_ms = decoder
            .total_duration()
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let track = SampleCapture::new(decoder.convert_samples::<f32>(), self.sample_buffer.clone());

        self.status.duration_ms.store(duration_ms, Ordering::SeqCst);
        self.status.position_ms.store(0, Ordering::SeqCst);
        // Reported as playing right away; the audio thread confirms on its next update.
        self.status.playing.store(true, Ordering::SeqCst);
        self.status.paused.store(false, Ordering::SeqCst);

        self.send(PlayerCommand::Play(track))?;
        tracing::info!(path = %path.display(), duration_ms, "playback started");
        Ok(())
    }

    /// Pause playback if currently playing.
    pub fn pause(&mut self) {
        self.status.paused.store(true, Ordering::SeqCst);
        let _ = self.send(PlayerCommand::Pause);
    }

    /// Resume playback if currently paused.
    pub fn resume(&mut self) {
        self.status.paused.store(false, Ordering::SeqCst);
        let _ = self.send(PlayerCommand::Resume);
    }

    /// Immediately halt playback (if any).
    pub fn stop(&mut self) {
        self.status.playing.store(false, Ordering::SeqCst);
        self.status.paused.store(false, Ordering::SeqCst);
        let _ = self.send(PlayerCommand::Stop);
    }

    /// Move the playhead. Formats that cannot seek log a warning and keep playing.
    pub fn seek(&mut self, position: Duration) {
        self.status
            .position_ms
            .store(position.as_millis() as u64, Ordering::SeqCst);
        let _ = self.send(PlayerCommand::Seek(position));
    }

    /// Returns true while a track is loaded and has not finished.
    pub fn is_playing(&self) -> bool {
        self.status.playing.load(Ordering::SeqCst)
    }

    /// Returns true if playback is currently paused.
    pub fn is_paused(&self) -> bool {
        self.status.paused.load(Ordering::SeqCst)
    }

    /// Last published playback position.
    pub fn position(&self) -> Duration {
        Duration::from_millis(self.status.position_ms.load(Ordering::SeqCst))
    }

    /// Track length reported by the decoder, if it knows.
    pub fn duration(&self) -> Option<Duration> {
        match self.status.duration_ms.load(Ordering::SeqCst) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Sampler over the captured output.
    pub fn analyser(&self) -> Analyser {
        Analyser::new(self.sample_buffer.clone(), self.fft_size)
    }

    fn send(&self, cmd: PlayerCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow!("audio thread is not running"))
    }
}
