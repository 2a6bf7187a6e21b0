// src/ui/layout.rs
//! Layout computation for the UI panels.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows taken by the player panel at the bottom of the screen.
const PLAYER_PANEL_HEIGHT: u16 = 6;

/// Braille cells hold 2x4 dots.
const DOTS_PER_CELL_X: f64 = 2.0;
const DOTS_PER_CELL_Y: f64 = 4.0;

/// Computed layout areas for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedLayout {
    /// Waveform pane (upper portion)
    pub waveform_area: Rect,
    /// Player controls and progress
    pub player_area: Rect,
}

/// Split the screen into the waveform pane and the player panel.
pub fn compute_layout(area: Rect) -> ComputedLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(PLAYER_PANEL_HEIGHT)])
        .split(area);

    ComputedLayout {
        waveform_area: chunks[0],
        player_area: chunks[1],
    }
}

/// Pixel dimensions of the waveform surface for a terminal of `area` cells.
pub fn waveform_viewport(area: Rect) -> (f64, f64) {
    let pane = compute_layout(area).waveform_area;
    (
        f64::from(pane.width) * DOTS_PER_CELL_X,
        f64::from(pane.height) * DOTS_PER_CELL_Y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_panel_at_bottom() {
        let layout = compute_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.waveform_area, Rect::new(0, 0, 80, 18));
        assert_eq!(layout.player_area, Rect::new(0, 18, 80, 6));
    }

    #[test]
    fn test_viewport_in_braille_dots() {
        assert_eq!(waveform_viewport(Rect::new(0, 0, 80, 24)), (160.0, 72.0));
    }
}
