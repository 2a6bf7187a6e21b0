// src/snapshot.rs
//! Offline rendering of a single waveform frame to a PNG.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use ringbuf::HeapRb;
use rodio::{Decoder, Source};

use crate::audio::visualizer::{PixmapSurface, WaveformRenderer};
use crate::audio::{Analyser, SampleCapture};
use crate::config::VisualizerConfig;

/// What to render and where to put it.
#[derive(Debug, Clone)]
pub struct SnapshotRequest<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    /// Playback position of the frame, in seconds.
    pub at_secs: f64,
    pub width: u32,
    pub height: u32,
}

/// Decode `input` up to `at_secs` plus one analysis window and paint the
/// frame a live player would show at that moment.
pub fn render_snapshot(config: &VisualizerConfig, request: &SnapshotRequest<'_>) -> Result<()> {
    if !(request.at_secs.is_finite() && request.at_secs >= 0.0) {
        bail!("snapshot position must be a non-negative number of seconds");
    }

    let file = File::open(request.input)
        .with_context(|| format!("failed to open {}", request.input.display()))?;
    let decoder = Decoder::new(BufReader::new(file))
        .with_context(|| format!("failed to decode {}", request.input.display()))?;

    if let Some(total) = decoder.total_duration() {
        if request.at_secs > total.as_secs_f64() {
            bail!(
                "snapshot position {}s is past the end of the track ({:.3}s)",
                request.at_secs,
                total.as_secs_f64()
            );
        }
    }

    let channels = usize::from(decoder.channels().max(1));
    let (skip, wanted) =
        decode_span(request.at_secs, decoder.sample_rate(), channels, config.fft_size)
            .with_context(|| format!("snapshot position {}s is out of range", request.at_secs))?;

    let buffer = Arc::new(Mutex::new(HeapRb::<f32>::new(config.fft_size)));
    let decoded = SampleCapture::new(decoder.convert_samples::<f32>(), buffer.clone())
        .take(wanted)
        .count();

    if decoded <= skip {
        bail!(
            "snapshot position {}s is past the end of the track",
            request.at_secs
        );
    }
    if decoded < wanted {
        tracing::warn!(
            decoded,
            wanted,
            "track ends inside the analysis window, rendering a partial frame"
        );
    }

    let analyser = Analyser::new(buffer, config.fft_size);
    let renderer = WaveformRenderer::from_config(config)?;
    let mut surface = PixmapSurface::new(request.width, request.height)?;
    renderer.render_pass(&analyser, &mut surface);
    surface.save_png(request.output)?;

    tracing::info!(
        input = %request.input.display(),
        output = %request.output.display(),
        at_secs = request.at_secs,
        "snapshot written"
    );
    Ok(())
}

/// Interleaved sample counts for a frame at `at_secs`: samples before the
/// window, and samples up to its end. `None` when they do not fit in `usize`.
fn decode_span(
    at_secs: f64,
    sample_rate: u32,
    channels: usize,
    fft_size: usize,
) -> Option<(usize, usize)> {
    let start_frame = (at_secs * f64::from(sample_rate)).floor();
    // usize::MAX as f64 rounds up, so anything below it converts losslessly
    if !(start_frame >= 0.0 && start_frame < usize::MAX as f64) {
        return None;
    }
    let start_frame = start_frame as usize;
    let skip = start_frame.checked_mul(channels)?;
    let wanted = start_frame.checked_add(fft_size)?.checked_mul(channels)?;
    Some((skip, wanted))
}
