// src/audio/visualizer/surface.rs
//! Drawing targets for the waveform renderer.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};

/// An opaque color parsed from `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = match s.strip_prefix('#') {
            Some(hex) if hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()) => hex,
            _ => bail!("expected a color like #rrggbb, got {s:?}"),
        };
        // Only hex digits reach here; from_str_radix would also take a sign.
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Rgb { r, g, b }),
            _ => bail!("expected a color like #rrggbb, got {s:?}"),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Pen used for the waveform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: Rgb,
}

/// An open polyline in surface pixel coordinates, y growing downwards.
///
/// The first point is a move-to, every following point a line-to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveformPath {
    points: Vec<(f64, f64)>,
    slice_width: f64,
}

impl WaveformPath {
    pub fn new(points: Vec<(f64, f64)>, slice_width: f64) -> Self {
        Self {
            points,
            slice_width,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Horizontal distance between consecutive samples.
    pub fn slice_width(&self) -> f64 {
        self.slice_width
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs, one per line-to.
    pub fn segments(&self) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// A raster target with fixed pixel dimensions.
///
/// A frame is one `clear` followed by at most one `stroke`.
pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (f64, f64);

    /// Fill the whole surface with `color`, discarding the previous frame.
    fn clear(&mut self, color: Rgb);

    /// Draw `path` with `style`.
    fn stroke(&mut self, path: &WaveformPath, style: &StrokeStyle);
}

/// Records draw calls instead of rasterizing them.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    pub clears: Vec<Rgb>,
    pub strokes: Vec<(WaveformPath, StrokeStyle)>,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgb) {
        self.clears.push(color);
    }

    fn stroke(&mut self, path: &WaveformPath, style: &StrokeStyle) {
        self.strokes.push((path.clone(), *style));
    }
}
