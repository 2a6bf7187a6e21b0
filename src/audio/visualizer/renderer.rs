// src/audio/visualizer/renderer.rs
//! Waveform geometry and painting.

use anyhow::Result;

use super::smoothing::smooth;
use super::surface::{Rgb, StrokeStyle, Surface, WaveformPath};
use crate::audio::analyser::{Analyser, SILENCE};
use crate::config::VisualizerConfig;

/// Turns sample buffers into a decorative waveform.
///
/// Each sample becomes one point spread evenly across the surface. Its
/// deviation from the midline is the smoothed amplitude, multiplied by a fixed
/// sine ripple along the index axis and by a falloff that is 1 at the
/// horizontal center and 0.5 at both edges. The ripple does not depend on the
/// audio.
#[derive(Debug, Clone)]
pub struct WaveformRenderer {
    smoothing_radius: usize,
    ripple_divisor: f64,
    amplitude_divisor: f64,
    background: Rgb,
    stroke: StrokeStyle,
}

impl WaveformRenderer {
    pub fn from_config(config: &VisualizerConfig) -> Result<Self> {
        Ok(Self {
            smoothing_radius: config.smoothing_radius,
            ripple_divisor: config.ripple_divisor,
            amplitude_divisor: config.amplitude_divisor,
            background: config.background.parse()?,
            stroke: StrokeStyle {
                width: config.line_width,
                color: config.stroke.parse()?,
            },
        })
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        self.stroke
    }

    /// Sample the analyser and paint one frame.
    pub fn render_pass<S: Surface + ?Sized>(&self, analyser: &Analyser, surface: &mut S) {
        let samples = analyser.sample();
        self.paint(&samples, surface);
    }

    /// Smooth `samples` and paint one frame. An empty buffer or a zero-width
    /// surface only clears.
    pub fn paint<S: Surface + ?Sized>(&self, samples: &[u8], surface: &mut S) {
        let smoothed = smooth(samples, self.smoothing_radius);

        surface.clear(self.background);

        let (width, height) = surface.size();
        let path = self.waveform_path(&smoothed, width, height);
        if path.is_empty() {
            tracing::trace!(samples = samples.len(), width, "skipping empty frame");
            return;
        }

        surface.stroke(&path, &self.stroke);
    }

    /// Map a smoothed buffer onto a `width` x `height` surface.
    ///
    /// The path ends with an extra point on the midline at the right edge.
    pub fn waveform_path(&self, smoothed: &[f64], width: f64, height: f64) -> WaveformPath {
        let n = smoothed.len();
        if n == 0 || !(width > 0.0) {
            return WaveformPath::empty();
        }

        let slice_width = width / n as f64;
        let middle_y = height / 2.0;
        let osc_amplitude = height / self.amplitude_divisor;
        let silence = f64::from(SILENCE);

        let mut points: Vec<(f64, f64)> = smoothed
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let index = i as f64;
                let v = value / silence;
                let osc_factor = 1.0 - (index / n as f64 - 0.5).abs();
                let ripple = (index / self.ripple_divisor).sin();
                let y = middle_y + ripple * osc_amplitude * (v - 1.0) * osc_factor;
                (index * slice_width, y)
            })
            .collect();
        points.push((width, middle_y));

        WaveformPath::new(points, slice_width)
    }
}
