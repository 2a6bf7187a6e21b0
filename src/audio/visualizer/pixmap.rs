// src/audio/visualizer/pixmap.rs
//! tiny-skia raster surface used for offline snapshots.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::surface::{Rgb, StrokeStyle, Surface, WaveformPath};

fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, 255)
}

/// An RGBA pixmap with anti-aliased strokes.
pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("invalid pixmap size {width}x{height}"))?;
        Ok(Self { pixmap })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.pixmap
            .save_png(path)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

impl Surface for PixmapSurface {
    fn size(&self) -> (f64, f64) {
        (f64::from(self.pixmap.width()), f64::from(self.pixmap.height()))
    }

    fn clear(&mut self, color: Rgb) {
        self.pixmap.fill(to_color(color));
    }

    fn stroke(&mut self, path: &WaveformPath, style: &StrokeStyle) {
        let mut pb = PathBuilder::new();
        for (i, &(x, y)) in path.points().iter().enumerate() {
            if i == 0 {
                pb.move_to(x as f32, y as f32);
            } else {
                pb.line_to(x as f32, y as f32);
            }
        }
        let Some(skia_path) = pb.finish() else {
            tracing::trace!(points = path.points().len(), "path too short to stroke");
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(to_color(style.color));
        paint.anti_alias = true;

        let stroke = Stroke {
            width: style.width,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        self.pixmap
            .stroke_path(&skia_path, &paint, &stroke, Transform::identity(), None);
    }
}
