// src/app/state.rs
//! Application state management.

use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::Frame;

use super::playback::{nudge, seek_target, sync_scheduler};
use crate::{
    audio::{metadata::load_metadata, MusicPlayer, TrackMetadata, Visualizer},
    config::WavelineConfig,
    ui::{
        keybindings::{key_to_action, PlayerAction},
        layout::compute_layout,
        widgets::{render_player_panel, PlayerView, TerminalSurface},
    },
};

/// Main application state.
pub struct App {
    /// Track being played
    pub track: PathBuf,
    /// Music player instance
    pub player: MusicPlayer,
    /// Tags of the current track, once the background loader delivers them
    pub metadata: Option<TrackMetadata>,
    /// Waveform pipeline
    pub visualizer: Visualizer,
    /// Last painted waveform frame
    pub surface: TerminalSurface,

    /// Metadata channel sender (background loader -> UI)
    meta_tx: Sender<TrackMetadata>,
    /// Metadata channel receiver
    meta_rx: Receiver<TrackMetadata>,

    /// Seconds moved by the seek keys
    seek_step: f64,
    /// Origin of the millisecond timestamps handed to the scheduler
    epoch: Instant,
}

impl App {
    /// Create the application for `track` with a waveform surface of
    /// `viewport` pixels. Fails when no audio output is available.
    pub fn new(config: &WavelineConfig, track: &Path, viewport: (f64, f64)) -> Result<Self> {
        let player = MusicPlayer::new(&config.player, config.visualizer.fft_size)?;
        let visualizer = Visualizer::new(&config.visualizer, player.analyser())?;
        let (meta_tx, meta_rx) = mpsc::channel::<TrackMetadata>();

        tracing::info!(width = viewport.0, height = viewport.1, "waveform surface created");

        Ok(Self {
            track: track.to_path_buf(),
            player,
            metadata: None,
            visualizer,
            surface: TerminalSurface::new(viewport.0, viewport.1),
            meta_tx,
            meta_rx,
            seek_step: config.player.seek_step_secs,
            epoch: Instant::now(),
        })
    }

    /// Start the track from the beginning.
    pub fn play(&mut self) -> Result<()> {
        self.player.play(&self.track)?;
        self.metadata = None;
        self.sync_visualizer();

        // Spawn a background thread to load metadata
        let tx = self.meta_tx.clone();
        let path = self.track.clone();
        thread::spawn(move || match load_metadata(&path) {
            Ok(meta) => {
                let _ = tx.send(meta);
            }
            Err(e) => tracing::warn!("no metadata: {:#}", e),
        });
        Ok(())
    }

    /// Play/pause. Playing starts the frame scheduler, pausing stops it.
    pub fn toggle_playback(&mut self) -> Result<()> {
        if !self.player.is_playing() {
            self.play()
        } else if self.player.is_paused() {
            self.player.resume();
            self.sync_visualizer();
            tracing::info!("playback resumed");
            Ok(())
        } else {
            self.player.pause();
            self.sync_visualizer();
            tracing::info!("playback paused");
            Ok(())
        }
    }

    fn sync_visualizer(&mut self) -> bool {
        sync_scheduler(
            self.player.is_playing(),
            self.player.is_paused(),
            &mut self.visualizer,
        )
    }

    /// Handle a key event and return true if the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key_to_action(&key) {
            PlayerAction::TogglePause => self.toggle_playback()?,
            PlayerAction::SeekBackward => self.seek_by(-self.seek_step),
            PlayerAction::SeekForward => self.seek_by(self.seek_step),
            PlayerAction::SeekPercent(percent) => self.seek_percent(f64::from(percent)),
            PlayerAction::Stop => {
                self.player.stop();
                self.sync_visualizer();
                tracing::info!("playback stopped");
            }
            PlayerAction::Quit => {
                self.shutdown();
                return Ok(true);
            }
            PlayerAction::None => {}
        }
        Ok(false)
    }

    /// Seek to `percent` of the track. Ignored while the duration is unknown.
    pub fn seek_percent(&mut self, percent: f64) {
        if let Some(duration) = self.duration() {
            let target = seek_target(percent, duration);
            tracing::debug!(percent, ?target, "seek");
            self.player.seek(target);
        }
    }

    fn seek_by(&mut self, delta_secs: f64) {
        let target = nudge(self.player.position(), delta_secs, self.duration());
        tracing::debug!(delta_secs, ?target, "seek");
        self.player.seek(target);
    }

    /// Total length: the decoder's figure, else the tagged one.
    pub fn duration(&self) -> Option<Duration> {
        self.player
            .duration()
            .or_else(|| self.metadata.as_ref().map(|m| m.duration))
            .filter(|d| !d.is_zero())
    }

    /// One host loop iteration: pick up metadata, notice the end of the
    /// track, and give the scheduler a chance to draw.
    pub fn tick(&mut self) {
        self.process_metadata();

        if self.sync_visualizer() && !self.visualizer.is_running() {
            tracing::info!("playback ended");
        }

        let now = self.epoch.elapsed().as_secs_f64() * 1000.0;
        self.visualizer.on_tick(now, &mut self.surface);
    }

    /// Process any pending metadata from background loader.
    pub fn process_metadata(&mut self) {
        if let Ok(meta) = self.meta_rx.try_recv() {
            tracing::debug!(title = ?meta.title, "metadata loaded");
            self.metadata = Some(meta);
        }
    }

    /// Stop playback and frame production before the view goes away.
    pub fn shutdown(&mut self) {
        self.visualizer.stop();
        self.player.stop();
    }

    /// Draw the application UI.
    pub fn draw(&mut self, f: &mut Frame<'_>) {
        let layout = compute_layout(f.area());

        f.render_widget(&self.surface, layout.waveform_area);

        let title = self
            .metadata
            .as_ref()
            .and_then(TrackMetadata::display_title)
            .unwrap_or_else(|| file_label(&self.track));

        render_player_panel(
            f,
            layout.player_area,
            &PlayerView {
                title: &title,
                elapsed: self.player.position(),
                duration: self.duration(),
                is_playing: self.player.is_playing(),
                is_paused: self.player.is_paused(),
            },
        );
    }
}

/// File name of `path`, or the whole path if it has none.
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
