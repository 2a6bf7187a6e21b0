// src/ui/widgets/mod.rs
//! Custom widgets for the waveline UI.

pub mod player_panel;
pub mod waveform;

// Re-export widget types
pub use player_panel::{render_player_panel, PlayerView};
pub use waveform::TerminalSurface;
