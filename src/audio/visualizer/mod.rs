// src/audio/visualizer/mod.rs
//! Real-time decorative waveform of the playing audio.
//!
//! Per frame: the scheduler admits a host tick, the analyser yields a byte
//! buffer, the renderer smooths it, maps it to a polyline and paints it onto a
//! [`Surface`].

mod pixmap;
mod renderer;
mod scheduler;
mod smoothing;
mod surface;

use anyhow::Result;

use crate::audio::Analyser;
use crate::config::VisualizerConfig;

pub use pixmap::PixmapSurface;
pub use renderer::WaveformRenderer;
pub use scheduler::{FrameClock, FrameDecision, FrameScheduler, SchedulerState};
pub use smoothing::smooth;
pub use surface::{Rgb, StrokeStyle, Surface, WaveformPath};

#[cfg(test)]
pub(crate) use surface::RecordingSurface;

/// Scheduler, sampler and renderer wired together.
pub struct Visualizer {
    analyser: Analyser,
    scheduler: FrameScheduler,
    renderer: WaveformRenderer,
}

impl Visualizer {
    pub fn new(config: &VisualizerConfig, analyser: Analyser) -> Result<Self> {
        Ok(Self {
            analyser,
            scheduler: FrameScheduler::new(config.target_fps),
            renderer: WaveformRenderer::from_config(config)?,
        })
    }

    /// Begin producing frames (playback started or resumed).
    pub fn start(&mut self) {
        self.scheduler.start();
    }

    /// Stop producing frames. The surface keeps the last frame.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn renderer(&self) -> &WaveformRenderer {
        &self.renderer
    }

    /// Host tick at `now` milliseconds; paints `surface` when a frame is due.
    pub fn on_tick<S: Surface + ?Sized>(&mut self, now: f64, surface: &mut S) -> FrameDecision {
        let decision = self.scheduler.tick(now);
        if decision == FrameDecision::Render {
            self.renderer.render_pass(&self.analyser, surface);
        }
        decision
    }
}
