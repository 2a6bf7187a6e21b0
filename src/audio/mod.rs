// src/audio/mod.rs
//! Audio module - handles playback, metadata, sampling and the waveform.

pub mod analyser;
pub mod metadata;
pub mod player;
pub mod sample_capture;
pub mod visualizer;

// Re-export commonly used types
pub use analyser::{Analyser, SampleBuffer};
pub use metadata::TrackMetadata;
pub use player::MusicPlayer;
pub use sample_capture::SampleCapture;
pub use visualizer::Visualizer;
