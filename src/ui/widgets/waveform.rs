// src/ui/widgets/waveform.rs
//! Terminal surface for the waveform, drawn with braille dots.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Widget,
    },
};

use crate::audio::visualizer::{Rgb, StrokeStyle, Surface, WaveformPath};

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Keeps the last painted frame and draws it into whatever area it is given.
///
/// Its pixel size is fixed when created; the canvas scales it to the pane.
/// Braille dots have no thickness, so the stroke width is not used.
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    width: f64,
    height: f64,
    background: Color,
    stroke: Color,
    path: WaveformPath,
}

impl TerminalSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: Color::Reset,
            stroke: Color::Reset,
            path: WaveformPath::empty(),
        }
    }

    /// The path of the last frame, if it drew one.
    pub fn path(&self) -> &WaveformPath {
        &self.path
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgb) {
        self.background = to_color(color);
        self.path = WaveformPath::empty();
    }

    fn stroke(&mut self, path: &WaveformPath, style: &StrokeStyle) {
        self.stroke = to_color(style.color);
        self.path = path.clone();
    }
}

impl Widget for &TerminalSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Canvas y grows upwards, surface y grows downwards.
        let height = self.height;
        Canvas::default()
            .background_color(self.background)
            .marker(Marker::Braille)
            .x_bounds([0.0, self.width])
            .y_bounds([0.0, self.height])
            .paint(|ctx| {
                for ((x1, y1), (x2, y2)) in self.path.segments() {
                    ctx.draw(&CanvasLine::new(x1, height - y1, x2, height - y2, self.stroke));
                }
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::analyser::SILENCE;
    use crate::audio::visualizer::WaveformRenderer;
    use crate::config::VisualizerConfig;

    #[test]
    fn test_clear_drops_previous_path() {
        let renderer = WaveformRenderer::from_config(&VisualizerConfig::default()).unwrap();
        let mut surface = TerminalSurface::new(40.0, 16.0);
        renderer.paint(&[SILENCE; 32], &mut surface);
        assert_eq!(surface.path().points().len(), 33);

        surface.clear(Rgb::BLACK);
        assert!(surface.path().is_empty());
    }

    #[test]
    fn test_renders_braille_dots() {
        let renderer = WaveformRenderer::from_config(&VisualizerConfig::default()).unwrap();
        let mut surface = TerminalSurface::new(40.0, 16.0);
        renderer.paint(&[SILENCE; 32], &mut surface);

        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);
        assert!(buf.content.iter().any(|cell| cell.symbol() != " "));
    }

    #[test]
    fn test_blank_surface_renders_nothing() {
        let surface = TerminalSurface::new(40.0, 16.0);
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);
        assert!(buf.content.iter().all(|cell| cell.symbol() == " "));
    }
}
